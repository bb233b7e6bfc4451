use serde::{Deserialize, Serialize};

use crate::{Post, ValidationError};

/// Resume point of the chronological feed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(pub i64);

impl std::fmt::Display for Cursor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
	pub posts: Vec<Post>,
	pub new_cursor: Cursor,
}
impl FeedPage {
	pub fn validate(&self) -> Result<(), ValidationError> {
		self.posts.iter().try_for_each(Post::validate)
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchState {
	#[serde(default)]
	pub query: String,
	#[serde(default)]
	pub search_results: Vec<Post>,
	#[serde(default)]
	pub search_cursor: Option<Cursor>,
}
impl SearchState {
	/// A search owns the scroll sentinel while its cursor is set.
	pub fn is_engaged(&self) -> bool {
		self.search_cursor.is_some()
	}

	/// A single result is the placeholder the backend sends for an exhausted or empty search.
	pub fn is_active(&self) -> bool {
		self.is_engaged() && self.search_results.len() > 1
	}

	pub fn result_count(&self) -> usize {
		self.search_results.len()
	}

	pub fn validate(&self) -> Result<(), ValidationError> {
		self.search_results.iter().try_for_each(Post::validate)
	}
}
