pub mod fixtures;

use std::{
	collections::{HashMap, VecDeque},
	sync::{Arc, Mutex, MutexGuard},
	time::Duration,
};

use tokio::sync::Semaphore;

use fischer_domain::{ComplianceVote, Cursor, FeedPage, Post, PostId, SearchState, UserId};
use fischer_feed::{BoxFuture, Error, FeedBackend, Result};

/// In-memory [`FeedBackend`] driven by a script of canned responses.
///
/// Every setter takes `&self`, so a test can keep an `Arc` to the backend it handed to the
/// engine and adjust the script between steps.
#[derive(Default)]
pub struct ScriptedBackend {
	script: Mutex<Script>,
}

/// Requests the backend has seen, in arrival order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallLog {
	pub pages: Vec<Cursor>,
	pub posts: Vec<PostId>,
	pub searches: Vec<String>,
	pub continuations: Vec<SearchState>,
	pub vote_loads: Vec<UserId>,
	pub submissions: Vec<ComplianceVote>,
}

#[derive(Default)]
struct Script {
	pages: HashMap<Cursor, FeedPage>,
	page_delays: HashMap<Cursor, VecDeque<Duration>>,
	page_failures: HashMap<Cursor, VecDeque<Error>>,
	posts: HashMap<PostId, Post>,
	searches: HashMap<String, SearchState>,
	continuations: VecDeque<(SearchState, Duration)>,
	user_votes: HashMap<UserId, (Vec<ComplianceVote>, Duration)>,
	submit_failures: usize,
	submit_gate: Option<Arc<Semaphore>>,
	calls: CallLog,
}

impl ScriptedBackend {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn into_arc(self) -> Arc<Self> {
		Arc::new(self)
	}

	pub fn page(&self, cursor: i64, page: FeedPage) {
		self.lock().pages.insert(Cursor(cursor), page);
	}

	/// Delays the next fetch of `cursor`. Queued delays are consumed one per call.
	pub fn delay_page(&self, cursor: i64, delay: Duration) {
		self.lock().page_delays.entry(Cursor(cursor)).or_default().push_back(delay);
	}

	/// Fails the next fetch of `cursor` with `err`.
	pub fn fail_page(&self, cursor: i64, err: Error) {
		self.lock().page_failures.entry(Cursor(cursor)).or_default().push_back(err);
	}

	pub fn post(&self, post: Post) {
		self.lock().posts.insert(post.id, post);
	}

	pub fn search(&self, query: &str, state: SearchState) {
		self.lock().searches.insert(query.to_string(), state);
	}

	/// Queues the response for the next search continuation.
	pub fn continuation(&self, state: SearchState, delay: Duration) {
		self.lock().continuations.push_back((state, delay));
	}

	pub fn user_votes(&self, user_id: UserId, votes: Vec<ComplianceVote>, delay: Duration) {
		self.lock().user_votes.insert(user_id, (votes, delay));
	}

	/// Fails the next `count` vote submissions.
	pub fn fail_submissions(&self, count: usize) {
		self.lock().submit_failures = count;
	}

	/// Parks every vote submission until [`ScriptedBackend::release_submissions`] is called.
	pub fn hold_submissions(&self) {
		self.lock().submit_gate = Some(Arc::new(Semaphore::new(0)));
	}

	pub fn release_submissions(&self) {
		if let Some(gate) = self.lock().submit_gate.take() {
			gate.close();
		}
	}

	pub fn calls(&self) -> CallLog {
		self.lock().calls.clone()
	}

	pub fn page_calls(&self) -> usize {
		self.lock().calls.pages.len()
	}

	pub fn submitted(&self) -> Vec<ComplianceVote> {
		self.lock().calls.submissions.clone()
	}

	fn lock(&self) -> MutexGuard<'_, Script> {
		self.script.lock().unwrap_or_else(|err| err.into_inner())
	}
}

impl FeedBackend for ScriptedBackend {
	fn fetch_page(&self, cursor: Cursor) -> BoxFuture<'_, Result<FeedPage>> {
		let (delay, response) = {
			let mut script = self.lock();

			script.calls.pages.push(cursor);

			let delay = script
				.page_delays
				.get_mut(&cursor)
				.and_then(VecDeque::pop_front)
				.unwrap_or_default();
			let failure = script.page_failures.get_mut(&cursor).and_then(VecDeque::pop_front);
			let response = match failure {
				Some(err) => Err(err),
				None => script.pages.get(&cursor).cloned().ok_or_else(|| Error::FetchFailure {
					message: format!("No page is scripted for cursor {cursor}."),
				}),
			};

			(delay, response)
		};

		Box::pin(async move {
			pause(delay).await;

			response
		})
	}

	fn fetch_post(&self, post_id: PostId) -> BoxFuture<'_, Result<Post>> {
		let response = {
			let mut script = self.lock();

			script.calls.posts.push(post_id);
			script.posts.get(&post_id).cloned().ok_or_else(|| Error::FetchFailure {
				message: format!("No post {post_id} is scripted."),
			})
		};

		Box::pin(async move { response })
	}

	fn start_search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<SearchState>> {
		let response = {
			let mut script = self.lock();

			script.calls.searches.push(query.to_string());
			script.searches.get(query).cloned().ok_or_else(|| Error::FetchFailure {
				message: format!("No search is scripted for {query:?}."),
			})
		};

		Box::pin(async move { response })
	}

	fn continue_search<'a>(&'a self, state: &'a SearchState) -> BoxFuture<'a, Result<SearchState>> {
		let (delay, response) = {
			let mut script = self.lock();

			script.calls.continuations.push(state.clone());

			match script.continuations.pop_front() {
				Some((next, delay)) => (delay, Ok(next)),
				None => (
					Duration::ZERO,
					Err(Error::FetchFailure {
						message: "No search continuation is scripted.".to_string(),
					}),
				),
			}
		};

		Box::pin(async move {
			pause(delay).await;

			response
		})
	}

	fn fetch_user_votes(&self, user_id: UserId) -> BoxFuture<'_, Result<Vec<ComplianceVote>>> {
		let (delay, votes) = {
			let mut script = self.lock();

			script.calls.vote_loads.push(user_id);
			script
				.user_votes
				.get(&user_id)
				.cloned()
				.map(|(votes, delay)| (delay, votes))
				.unwrap_or_default()
		};

		Box::pin(async move {
			pause(delay).await;

			Ok(votes)
		})
	}

	fn submit_vote<'a>(&'a self, vote: &'a ComplianceVote) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let gate = self.lock().submit_gate.clone();

			if let Some(gate) = gate {
				let _ = gate.acquire().await;
			}

			let mut script = self.lock();

			script.calls.submissions.push(*vote);

			if script.submit_failures > 0 {
				script.submit_failures -= 1;

				return Err(Error::FetchFailure {
					message: format!("Scripted submission failure for post {}.", vote.post_id),
				});
			}

			Ok(())
		})
	}
}

async fn pause(delay: Duration) {
	if !delay.is_zero() {
		tokio::time::sleep(delay).await;
	}
}
