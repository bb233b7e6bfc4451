pub mod cursor;
pub mod detail;
pub mod engine;
pub mod merge;
pub mod mode;
pub mod presenter;
pub mod throttle;
pub mod trigger;
pub mod votes;

mod error;

pub use cursor::{CursorStore, FetchTicket};
pub use detail::{DetailStatus, PostDetail};
pub use engine::{EngineSettings, FeedEngine, FetchOutcome, VoteOutcome, VoteTicket};
pub use error::{Error, Result};
pub use merge::{MergeReport, PostCollection};
pub use mode::{Continuation, FetchMode};
pub use presenter::{ScoreView, TruthBand, Truthiness};
pub use throttle::ThrottleGate;
pub use trigger::{TriggerDeps, VisibilityTrigger};
pub use votes::{UserComplianceIndex, VoteEntry, VoteStatus};

use std::{future::Future, pin::Pin};

use fischer_domain::{ComplianceVote, Cursor, FeedPage, Post, PostId, SearchState, UserId};
use fischer_providers::HttpBackend;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Everything the engine needs from the outside world. All calls may suspend.
pub trait FeedBackend
where
	Self: Send + Sync,
{
	fn fetch_page(&self, cursor: Cursor) -> BoxFuture<'_, Result<FeedPage>>;

	fn fetch_post(&self, post_id: PostId) -> BoxFuture<'_, Result<Post>>;

	fn start_search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<SearchState>>;

	fn continue_search<'a>(&'a self, state: &'a SearchState) -> BoxFuture<'a, Result<SearchState>>;

	fn fetch_user_votes(&self, user_id: UserId) -> BoxFuture<'_, Result<Vec<ComplianceVote>>>;

	fn submit_vote<'a>(&'a self, vote: &'a ComplianceVote) -> BoxFuture<'a, Result<()>>;
}

impl FeedBackend for HttpBackend {
	fn fetch_page(&self, cursor: Cursor) -> BoxFuture<'_, Result<FeedPage>> {
		Box::pin(async move { Ok(HttpBackend::fetch_page(self, cursor).await?) })
	}

	fn fetch_post(&self, post_id: PostId) -> BoxFuture<'_, Result<Post>> {
		Box::pin(async move { Ok(HttpBackend::fetch_post(self, post_id).await?) })
	}

	fn start_search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<SearchState>> {
		Box::pin(async move { Ok(HttpBackend::start_search(self, query).await?) })
	}

	fn continue_search<'a>(&'a self, state: &'a SearchState) -> BoxFuture<'a, Result<SearchState>> {
		Box::pin(async move { Ok(HttpBackend::continue_search(self, state).await?) })
	}

	fn fetch_user_votes(&self, user_id: UserId) -> BoxFuture<'_, Result<Vec<ComplianceVote>>> {
		Box::pin(async move { Ok(HttpBackend::fetch_user_votes(self, user_id).await?) })
	}

	fn submit_vote<'a>(&'a self, vote: &'a ComplianceVote) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(HttpBackend::submit_vote(self, vote).await?) })
	}
}
