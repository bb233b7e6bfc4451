use std::collections::HashMap;

use fischer_domain::{ComplianceVote, PostId, UserId};

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteStatus {
	/// Loaded from the backend or acknowledged by it.
	Confirmed,
	/// Recorded locally, first submission still in flight.
	Pending,
	/// At least one submission failed; retries are still scheduled.
	Unconfirmed { attempts: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoteEntry {
	pub vote: ComplianceVote,
	pub status: VoteStatus,
}

/// The signed-in user's votes keyed by post. Gates the voting affordance.
///
/// Each identity change starts a new epoch. Writers pass the epoch they started under so
/// results that arrive after a login or logout cannot leak into another user's index.
#[derive(Clone, Debug, Default)]
pub struct UserComplianceIndex {
	user_id: Option<UserId>,
	epoch: u64,
	entries: HashMap<PostId, VoteEntry>,
}
impl UserComplianceIndex {
	pub fn user_id(&self) -> Option<UserId> {
		self.user_id
	}

	pub fn epoch(&self) -> u64 {
		self.epoch
	}

	pub fn get(&self, post_id: PostId) -> Option<&VoteEntry> {
		self.entries.get(&post_id)
	}

	pub fn has_voted(&self, post_id: PostId) -> bool {
		self.entries.contains_key(&post_id)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn entries(&self) -> impl Iterator<Item = &VoteEntry> {
		self.entries.values()
	}

	/// Switches identity and clears every entry. Returns `None` when the identity is unchanged.
	pub fn switch_identity(&mut self, user_id: Option<UserId>) -> Option<u64> {
		if user_id == self.user_id {
			return None;
		}

		self.user_id = user_id;
		self.epoch += 1;
		self.entries.clear();

		Some(self.epoch)
	}

	/// Adds the backend's vote list as confirmed entries. Entries recorded locally in the same
	/// epoch stay, so a vote cast while the list was loading survives.
	pub fn merge_history(&mut self, epoch: u64, votes: Vec<ComplianceVote>) -> bool {
		if epoch != self.epoch {
			return false;
		}

		for vote in votes {
			self.entries.insert(vote.post_id, VoteEntry { vote, status: VoteStatus::Confirmed });
		}

		true
	}

	/// Records an optimistic vote for the current user and returns the epoch it belongs to.
	pub fn record_pending(&mut self, vote: ComplianceVote) -> Result<u64> {
		let Some(user_id) = self.user_id else {
			return Err(Error::Unauthenticated);
		};

		if vote.fischer_id != user_id {
			return Err(Error::InvalidRequest {
				message: format!("Vote belongs to user {}, not user {user_id}.", vote.fischer_id),
			});
		}
		if self.entries.contains_key(&vote.post_id) {
			return Err(Error::DuplicateVoteAttempt { post_id: vote.post_id });
		}

		self.entries.insert(vote.post_id, VoteEntry { vote, status: VoteStatus::Pending });

		Ok(self.epoch)
	}

	pub fn mark(&mut self, epoch: u64, post_id: PostId, status: VoteStatus) -> bool {
		if epoch != self.epoch {
			return false;
		}

		match self.entries.get_mut(&post_id) {
			Some(entry) => {
				entry.status = status;

				true
			},
			None => false,
		}
	}

	/// Drops an optimistic entry that the backend never accepted. Confirmed entries stay.
	pub fn revert(&mut self, epoch: u64, post_id: PostId) -> bool {
		if epoch != self.epoch {
			return false;
		}

		let Some(entry) = self.entries.get(&post_id) else {
			return false;
		};

		if entry.status == VoteStatus::Confirmed {
			return false;
		}

		self.entries.remove(&post_id).is_some()
	}
}
