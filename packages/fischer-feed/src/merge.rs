use std::collections::HashSet;

use fischer_domain::{FeedPage, Post, PostId, SearchState};

use crate::{CursorStore, FetchTicket};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
	pub appended: usize,
	pub duplicates: usize,
}

/// Append-only, arrival-ordered posts with unique ids.
#[derive(Clone, Debug, Default)]
pub struct PostCollection {
	posts: Vec<Post>,
	ids: HashSet<PostId>,
}
impl PostCollection {
	pub fn from_posts(posts: impl IntoIterator<Item = Post>) -> Self {
		let mut collection = Self::default();

		collection.append(posts);

		collection
	}

	/// Appends posts whose id is not present yet, keeping their relative order.
	pub fn append(&mut self, posts: impl IntoIterator<Item = Post>) -> MergeReport {
		let mut report = MergeReport::default();

		for post in posts {
			if self.ids.insert(post.id) {
				self.posts.push(post);

				report.appended += 1;
			} else {
				report.duplicates += 1;
			}
		}

		report
	}

	pub fn as_slice(&self) -> &[Post] {
		&self.posts
	}

	pub fn len(&self) -> usize {
		self.posts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.posts.is_empty()
	}

	pub fn contains(&self, post_id: PostId) -> bool {
		self.ids.contains(&post_id)
	}

	pub fn get(&self, post_id: PostId) -> Option<&Post> {
		if !self.contains(post_id) {
			return None;
		}

		self.posts.iter().find(|post| post.id == post_id)
	}

	pub fn ids(&self) -> Vec<PostId> {
		self.posts.iter().map(|post| post.id).collect()
	}
}

/// Applies a normal-mode page and advances the cursor. `None` means the ticket was stale and
/// nothing changed.
pub fn merge_normal_page(
	collection: &mut PostCollection,
	store: &mut CursorStore,
	ticket: &FetchTicket,
	page: FeedPage,
) -> Option<MergeReport> {
	if !store.is_current(ticket) {
		return None;
	}

	let FeedPage { posts, new_cursor } = page;
	let report = collection.append(posts);

	store.advance(ticket, new_cursor);

	Some(report)
}

/// Replaces the search state with a continuation result, dropping repeated ids. `None` means
/// the ticket was stale and nothing changed.
pub fn merge_search_page(
	store: &mut CursorStore,
	ticket: &FetchTicket,
	state: SearchState,
) -> Option<MergeReport> {
	if !store.is_current(ticket) {
		return None;
	}

	let known: HashSet<PostId> = store.search().search_results.iter().map(|post| post.id).collect();
	let SearchState { query, search_results, search_cursor } = state;
	let deduped = PostCollection::from_posts(search_results);
	let appended = deduped.as_slice().iter().filter(|post| !known.contains(&post.id)).count();
	let duplicates = deduped.len() - appended;
	let state = SearchState { query, search_results: deduped.posts, search_cursor };

	store.replace_search(ticket, state);

	Some(MergeReport { appended, duplicates })
}
