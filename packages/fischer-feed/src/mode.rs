use fischer_domain::{Cursor, SearchState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchMode {
	Normal,
	Search,
}
impl FetchMode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Normal => "normal",
			Self::Search => "search",
		}
	}
}

/// What a sentinel trigger should do, decided when it fires.
#[derive(Clone, Debug, PartialEq)]
pub enum Continuation {
	Normal { cursor: Cursor },
	Search { state: SearchState },
	/// Search mode owns the sentinel but has nothing more to fetch.
	Exhausted,
}
impl Continuation {
	pub fn mode(&self) -> FetchMode {
		match self {
			Self::Normal { .. } => FetchMode::Normal,
			Self::Search { .. } | Self::Exhausted => FetchMode::Search,
		}
	}
}

pub fn mode_of(search: &SearchState) -> FetchMode {
	if search.is_engaged() { FetchMode::Search } else { FetchMode::Normal }
}

pub fn select(cursor: Cursor, search: &SearchState) -> Continuation {
	match mode_of(search) {
		FetchMode::Normal => Continuation::Normal { cursor },
		FetchMode::Search if search.is_active() => Continuation::Search { state: search.clone() },
		FetchMode::Search => Continuation::Exhausted,
	}
}
