use fischer_domain::{Cursor, SearchState};

use crate::{
	FetchMode, TriggerDeps,
	mode::{self, Continuation},
};

/// Identifies one issued continuation fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
	pub seq: u64,
	pub search_epoch: u64,
	pub mode: FetchMode,
}

/// Pagination state for both fetch modes.
///
/// Every issued fetch gets a sequence number. A result is applied only when the search
/// epoch it was issued under is still current and its sequence is newer than the last
/// applied result of the same mode, so late or out-of-order completions cannot roll a
/// cursor back.
#[derive(Debug)]
pub struct CursorStore {
	cursor: Cursor,
	search: SearchState,
	search_epoch: u64,
	next_seq: u64,
	applied_normal: u64,
	applied_search: u64,
}
impl CursorStore {
	pub fn new(cursor: Cursor) -> Self {
		Self {
			cursor,
			search: SearchState::default(),
			search_epoch: 0,
			next_seq: 1,
			applied_normal: 0,
			applied_search: 0,
		}
	}

	pub fn cursor(&self) -> Cursor {
		self.cursor
	}

	pub fn search(&self) -> &SearchState {
		&self.search
	}

	pub fn search_epoch(&self) -> u64 {
		self.search_epoch
	}

	pub fn mode(&self) -> FetchMode {
		mode::mode_of(&self.search)
	}

	pub fn deps(&self) -> TriggerDeps {
		TriggerDeps { cursor: self.cursor, search_epoch: self.search_epoch }
	}

	pub fn continuation(&self) -> Continuation {
		mode::select(self.cursor, &self.search)
	}

	pub fn issue(&mut self, mode: FetchMode) -> FetchTicket {
		let seq = self.next_seq;

		self.next_seq += 1;

		FetchTicket { seq, search_epoch: self.search_epoch, mode }
	}

	pub fn is_current(&self, ticket: &FetchTicket) -> bool {
		ticket.search_epoch == self.search_epoch && ticket.seq > self.applied(ticket.mode)
	}

	/// Replaces the normal-mode cursor. Returns `false` and changes nothing for a stale ticket.
	pub fn advance(&mut self, ticket: &FetchTicket, cursor: Cursor) -> bool {
		if ticket.mode != FetchMode::Normal || !self.is_current(ticket) {
			return false;
		}

		self.cursor = cursor;
		self.applied_normal = ticket.seq;

		true
	}

	/// Replaces the search state from a continuation. Returns `false` for a stale ticket.
	pub fn replace_search(&mut self, ticket: &FetchTicket, state: SearchState) -> bool {
		if ticket.mode != FetchMode::Search || !self.is_current(ticket) {
			return false;
		}

		self.search = state;
		self.applied_search = ticket.seq;

		true
	}

	/// Installs the first page of a new search. Results of fetches issued before are ignored.
	pub fn begin_search(&mut self, state: SearchState) {
		self.search = state;
		self.search_epoch += 1;
	}

	pub fn clear_search(&mut self) {
		self.search = SearchState::default();
		self.search_epoch += 1;
	}

	fn applied(&self, mode: FetchMode) -> u64 {
		match mode {
			FetchMode::Normal => self.applied_normal,
			FetchMode::Search => self.applied_search,
		}
	}
}
