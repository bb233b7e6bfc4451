use std::{
	future::Future,
	sync::{
		Arc, Mutex, MutexGuard,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use tokio::task::JoinHandle;

use fischer_config::Config;
use fischer_domain::{
	Compliance, ComplianceVote, Cursor, FeedPage, Post, PostId, SearchState, UserId,
};

use crate::{
	Continuation, CursorStore, Error, FeedBackend, FetchMode, MergeReport, PostCollection, Result,
	TriggerDeps, UserComplianceIndex, VisibilityTrigger, VoteEntry, VoteStatus, merge,
};

#[derive(Clone, Copy, Debug)]
pub struct EngineSettings {
	pub throttle: Duration,
	pub fetch_timeout: Duration,
	pub max_submit_attempts: u32,
	pub retry_backoff: Duration,
}
impl EngineSettings {
	pub fn from_config(cfg: &Config) -> Self {
		Self {
			throttle: Duration::from_millis(cfg.feed.throttle_ms),
			fetch_timeout: Duration::from_millis(cfg.feed.fetch_timeout_ms),
			max_submit_attempts: cfg.votes.max_submit_attempts.max(1),
			retry_backoff: Duration::from_millis(cfg.votes.retry_backoff_ms),
		}
	}
}

impl Default for EngineSettings {
	fn default() -> Self {
		Self {
			throttle: Duration::from_millis(600),
			fetch_timeout: Duration::from_secs(15),
			max_submit_attempts: 3,
			retry_backoff: Duration::from_millis(500),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
	Merged { mode: FetchMode, report: MergeReport },
	/// The result arrived after the mode changed or a newer result was applied, or the trigger
	/// binding that scheduled the fetch went stale before it started.
	Stale { mode: FetchMode },
	/// Search mode is engaged but has nothing left to fetch.
	Exhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
	Confirmed,
	Reverted,
	/// The identity changed before the backend acknowledged the vote.
	Abandoned,
}

/// Returned by [`FeedEngine::submit_vote`]. The vote is already in the local index; awaiting
/// `reconciliation` is optional.
#[derive(Debug)]
pub struct VoteTicket {
	pub vote: ComplianceVote,
	pub reconciliation: JoinHandle<VoteOutcome>,
}

/// Infinite-scroll feed state and the commands that change it.
///
/// Cloning is cheap and every clone drives the same feed. Read methods return snapshots and
/// never hold the engine lock while caller code runs.
#[derive(Clone)]
pub struct FeedEngine {
	inner: Arc<Inner>,
}

struct Inner {
	backend: Arc<dyn FeedBackend>,
	settings: EngineSettings,
	state: Mutex<FeedState>,
	loading: AtomicUsize,
}

struct FeedState {
	collection: PostCollection,
	store: CursorStore,
	trigger: VisibilityTrigger,
	votes: UserComplianceIndex,
}

/// Holds the loading flag up for as long as it lives.
struct LoadingGuard(Arc<Inner>);
impl LoadingGuard {
	fn new(inner: &Arc<Inner>) -> Self {
		inner.loading.fetch_add(1, Ordering::SeqCst);

		Self(inner.clone())
	}
}

impl Drop for LoadingGuard {
	fn drop(&mut self) {
		self.0.loading.fetch_sub(1, Ordering::SeqCst);
	}
}

enum Request {
	Page(Cursor),
	Search(SearchState),
}

enum Fetched {
	Page(FeedPage),
	Search(SearchState),
}

impl FeedEngine {
	pub fn with_first_page(
		settings: EngineSettings,
		backend: Arc<dyn FeedBackend>,
		page: FeedPage,
	) -> Self {
		let FeedPage { posts, new_cursor } = page;
		let store = CursorStore::new(new_cursor);
		let trigger = VisibilityTrigger::new(store.deps(), settings.throttle);
		let state = FeedState {
			collection: PostCollection::from_posts(posts),
			store,
			trigger,
			votes: UserComplianceIndex::default(),
		};
		let loading = AtomicUsize::new(0);

		Self { inner: Arc::new(Inner { backend, settings, state: Mutex::new(state), loading }) }
	}

	/// Loads the first page at `initial_cursor` and seeds the engine with it.
	pub async fn bootstrap(
		settings: EngineSettings,
		backend: Arc<dyn FeedBackend>,
		initial_cursor: Cursor,
	) -> Result<Self> {
		let page = with_timeout(settings.fetch_timeout, backend.fetch_page(initial_cursor)).await?;

		tracing::info!(
			cursor = %initial_cursor,
			posts = page.posts.len(),
			new_cursor = %page.new_cursor,
			"Loaded first feed page."
		);

		Ok(Self::with_first_page(settings, backend, page))
	}

	pub fn settings(&self) -> EngineSettings {
		self.inner.settings
	}

	pub fn posts(&self) -> Vec<Post> {
		self.lock().collection.as_slice().to_vec()
	}

	/// Runs `f` over a snapshot of the collection. `f` may call back into the engine.
	pub fn with_posts<R>(&self, f: impl FnOnce(&[Post]) -> R) -> R {
		let posts = self.posts();

		f(&posts)
	}

	/// Search results while a search owns the feed, the chronological collection otherwise.
	pub fn visible_posts(&self) -> Vec<Post> {
		let state = self.lock();

		match state.store.mode() {
			FetchMode::Search => state.store.search().search_results.clone(),
			FetchMode::Normal => state.collection.as_slice().to_vec(),
		}
	}

	pub fn cursor(&self) -> Cursor {
		self.lock().store.cursor()
	}

	pub fn search_state(&self) -> SearchState {
		self.lock().store.search().clone()
	}

	pub fn mode(&self) -> FetchMode {
		self.lock().store.mode()
	}

	pub fn is_loading(&self) -> bool {
		self.inner.loading.load(Ordering::SeqCst) > 0
	}

	pub fn user_id(&self) -> Option<UserId> {
		self.lock().votes.user_id()
	}

	pub fn vote_for(&self, post_id: PostId) -> Option<VoteEntry> {
		self.lock().votes.get(post_id).copied()
	}

	pub fn has_voted(&self, post_id: PostId) -> bool {
		self.lock().votes.has_voted(post_id)
	}

	/// Runs `f` over a snapshot of the vote index. `f` may call back into the engine.
	pub fn with_votes<R>(&self, f: impl FnOnce(&UserComplianceIndex) -> R) -> R {
		let votes = self.lock().votes.clone();

		f(&votes)
	}

	/// Feeds a visibility observation of the end-of-list sentinel.
	///
	/// Rebinds the trigger first when the cursor or search mode changed since the last
	/// observation. A not-visible to visible transition then passes through the throttle
	/// gate. Returns the scheduled continuation, if one was started.
	///
	/// Must be called from within a tokio runtime.
	pub fn sentinel_visibility(&self, visible: bool) -> Option<JoinHandle<()>> {
		let mut state = self.lock();
		let deps = state.store.deps();

		if state.trigger.sync(deps) {
			tracing::debug!(
				cursor = %deps.cursor,
				search_epoch = deps.search_epoch,
				"Rebound scroll trigger."
			);
		}
		if !state.trigger.observe(visible) {
			return None;
		}

		self.schedule(&mut state)
	}

	/// Asks for the next page through the throttle gate, regardless of sentinel visibility.
	///
	/// Must be called from within a tokio runtime.
	pub fn request_more(&self) -> Option<JoinHandle<()>> {
		let mut state = self.lock();
		let deps = state.store.deps();

		state.trigger.sync(deps);

		self.schedule(&mut state)
	}

	/// Fetches and merges the next page of the active mode right away, without throttling.
	pub async fn continue_feed(&self) -> Result<FetchOutcome> {
		let _loading = LoadingGuard::new(&self.inner);

		self.run_continuation(None).await
	}

	pub async fn begin_search(&self, query: &str) -> Result<usize> {
		let query = query.trim();

		if query.is_empty() {
			return Err(Error::InvalidRequest { message: "Search query is empty.".to_string() });
		}

		let state = self.fetch(self.inner.backend.start_search(query)).await?;
		let count = state.result_count();
		let mut guard = self.lock();

		guard.store.begin_search(state);

		tracing::info!(
			query,
			results = count,
			search_epoch = guard.store.search_epoch(),
			"Search started."
		);

		Ok(count)
	}

	pub fn clear_search(&self) {
		let mut state = self.lock();

		if state.store.mode() == FetchMode::Normal && state.store.search().result_count() == 0 {
			return;
		}

		state.store.clear_search();

		tracing::info!(search_epoch = state.store.search_epoch(), "Search cleared.");
	}

	/// Applies a login, logout or account switch.
	///
	/// A logout clears the vote index. A new user's votes are loaded; until they arrive the
	/// index is empty.
	pub async fn set_identity(&self, user_id: Option<UserId>) -> Result<()> {
		let switched = self.lock().votes.switch_identity(user_id).is_some();

		if !switched {
			return Ok(());
		}

		tracing::info!(user_id, "Identity changed.");

		match user_id {
			Some(user_id) => self.load_user_votes(user_id).await.map(|_| ()),
			None => Ok(()),
		}
	}

	/// Merges the backend's vote list for the current user into the index.
	pub async fn load_user_votes(&self, user_id: UserId) -> Result<usize> {
		let epoch = {
			let state = self.lock();

			if state.votes.user_id() != Some(user_id) {
				return Err(Error::InvalidRequest {
					message: format!("User {user_id} is not the current identity."),
				});
			}

			state.votes.epoch()
		};
		let votes = match self.fetch(self.inner.backend.fetch_user_votes(user_id)).await {
			Ok(votes) => votes,
			Err(err) => {
				tracing::warn!(error = %err, user_id, "Vote history fetch failed.");

				return Err(err);
			},
		};
		let count = votes.len();

		if !self.lock().votes.merge_history(epoch, votes) {
			tracing::info!(user_id, "Discarded vote history of a previous identity.");

			return Ok(0);
		}

		tracing::info!(user_id, votes = count, "Vote history loaded.");

		Ok(count)
	}

	/// Records the vote locally and submits it in the background.
	///
	/// The index entry exists when this returns. A post that already has an entry is refused
	/// without contacting the backend. Failed submissions are retried; after the last failed
	/// attempt the entry is removed again.
	///
	/// Must be called from within a tokio runtime.
	pub fn submit_vote(&self, post_id: PostId, compliance: Compliance) -> Result<VoteTicket> {
		let (vote, epoch) = {
			let mut state = self.lock();
			let Some(user_id) = state.votes.user_id() else {
				return Err(Error::Unauthenticated);
			};
			let vote = ComplianceVote { post_id, fischer_id: user_id, compliance };
			let epoch = state.votes.record_pending(vote)?;

			(vote, epoch)
		};

		tracing::info!(
			post_id,
			user_id = vote.fischer_id,
			compliance = compliance.value(),
			"Vote recorded."
		);

		let engine = self.clone();
		let reconciliation = tokio::spawn(async move { engine.reconcile_vote(vote, epoch).await });

		Ok(VoteTicket { vote, reconciliation })
	}

	fn schedule(&self, state: &mut FeedState) -> Option<JoinHandle<()>> {
		let continuation = state.store.continuation();

		if continuation == Continuation::Exhausted {
			tracing::debug!("Search exhausted; trigger ignored.");

			return None;
		}

		let binding = (state.store.deps(), continuation.mode());
		let loading = LoadingGuard::new(&self.inner);
		let engine = self.clone();
		let handle = state.trigger.fire(async move {
			let _loading = loading;

			if let Err(err) = engine.run_continuation(Some(binding)).await {
				tracing::warn!(error = %err, "Scroll continuation failed.");
			}
		});

		match handle {
			Some(handle) => {
				tracing::debug!(mode = continuation.mode().as_str(), "Scroll trigger accepted.");

				Some(handle)
			},
			None => {
				tracing::debug!("Scroll trigger dropped by throttle.");

				None
			},
		}
	}

	/// `binding` is the trigger state a scheduled continuation was accepted under. When it no
	/// longer matches, the continuation is dropped without contacting the backend.
	async fn run_continuation(
		&self,
		binding: Option<(TriggerDeps, FetchMode)>,
	) -> Result<FetchOutcome> {
		let (ticket, request) = {
			let mut state = self.lock();

			if let Some((deps, mode)) = binding
				&& state.store.deps() != deps
			{
				tracing::info!(
					mode = mode.as_str(),
					cursor = %deps.cursor,
					search_epoch = deps.search_epoch,
					"Dropped continuation of a stale trigger binding."
				);

				return Ok(FetchOutcome::Stale { mode });
			}

			let request = match state.store.continuation() {
				Continuation::Normal { cursor } => Request::Page(cursor),
				Continuation::Search { state } => Request::Search(state),
				Continuation::Exhausted => return Ok(FetchOutcome::Exhausted),
			};
			let mode = match request {
				Request::Page(_) => FetchMode::Normal,
				Request::Search(_) => FetchMode::Search,
			};

			(state.store.issue(mode), request)
		};

		tracing::debug!(
			mode = ticket.mode.as_str(),
			seq = ticket.seq,
			search_epoch = ticket.search_epoch,
			"Fetch issued."
		);

		let fetched = match request {
			Request::Page(cursor) => {
				self.fetch(self.inner.backend.fetch_page(cursor)).await.map(Fetched::Page)
			},
			Request::Search(search) => {
				self.fetch(self.inner.backend.continue_search(&search)).await.map(Fetched::Search)
			},
		};
		let mut state = self.lock();
		let fetched = match fetched {
			Ok(fetched) => fetched,
			Err(err) => {
				tracing::warn!(
					error = %err,
					mode = ticket.mode.as_str(),
					seq = ticket.seq,
					"Feed fetch failed; state left unchanged."
				);

				return Err(err);
			},
		};
		let FeedState { collection, store, .. } = &mut *state;
		let merged = match fetched {
			Fetched::Page(page) => merge::merge_normal_page(collection, store, &ticket, page),
			Fetched::Search(search) => merge::merge_search_page(store, &ticket, search),
		};

		match merged {
			Some(report) => {
				tracing::info!(
					mode = ticket.mode.as_str(),
					seq = ticket.seq,
					appended = report.appended,
					duplicates = report.duplicates,
					cursor = %store.cursor(),
					"Page merged."
				);

				Ok(FetchOutcome::Merged { mode: ticket.mode, report })
			},
			None => {
				tracing::info!(
					mode = ticket.mode.as_str(),
					seq = ticket.seq,
					"Suppressed stale fetch result."
				);

				Ok(FetchOutcome::Stale { mode: ticket.mode })
			},
		}
	}

	async fn reconcile_vote(&self, vote: ComplianceVote, epoch: u64) -> VoteOutcome {
		let attempts = self.inner.settings.max_submit_attempts.max(1);

		for attempt in 1..=attempts {
			if self.lock().votes.epoch() != epoch {
				tracing::info!(
					post_id = vote.post_id,
					attempt,
					"Identity changed; vote submission abandoned."
				);

				return VoteOutcome::Abandoned;
			}

			match self.fetch(self.inner.backend.submit_vote(&vote)).await {
				Ok(()) => {
					self.lock().votes.mark(epoch, vote.post_id, VoteStatus::Confirmed);

					tracing::info!(post_id = vote.post_id, attempt, "Vote confirmed.");

					return VoteOutcome::Confirmed;
				},
				Err(err) => {
					tracing::warn!(
						error = %err,
						post_id = vote.post_id,
						attempt,
						max_attempts = attempts,
						"Vote submission failed."
					);
				},
			}

			if attempt < attempts {
				self.lock().votes.mark(
					epoch,
					vote.post_id,
					VoteStatus::Unconfirmed { attempts: attempt },
				);

				tokio::time::sleep(self.inner.settings.retry_backoff * attempt).await;
			}
		}

		self.lock().votes.revert(epoch, vote.post_id);

		tracing::warn!(post_id = vote.post_id, attempts, "Vote reverted after failed submissions.");

		VoteOutcome::Reverted
	}

	async fn fetch<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
		with_timeout(self.inner.settings.fetch_timeout, fut).await
	}

	fn lock(&self) -> MutexGuard<'_, FeedState> {
		self.inner.state.lock().unwrap_or_else(|err| err.into_inner())
	}
}

async fn with_timeout<T>(timeout: Duration, fut: impl Future<Output = Result<T>>) -> Result<T> {
	match tokio::time::timeout(timeout, fut).await {
		Ok(result) => result,
		Err(_) => Err(Error::FetchTimeout { timeout_ms: timeout.as_millis() as u64 }),
	}
}
