use fischer_domain::{ComplianceRecord, ComplianceVote, Post, PostId};

use crate::{Error, FeedBackend, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailStatus {
	Idle,
	Loading,
}

/// State behind a single-post page: the loaded post, a loading flag and the last error.
#[derive(Debug)]
pub struct PostDetail {
	post: Option<Post>,
	status: DetailStatus,
	error: Option<String>,
}
impl PostDetail {
	pub fn new() -> Self {
		Self { post: None, status: DetailStatus::Idle, error: None }
	}

	pub fn post(&self) -> Option<&Post> {
		self.post.as_ref()
	}

	pub fn status(&self) -> DetailStatus {
		self.status
	}

	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	/// A failed load keeps the previously shown post.
	pub async fn load(&mut self, backend: &dyn FeedBackend, post_id: PostId) -> Result<()> {
		self.status = DetailStatus::Loading;

		let result = backend.fetch_post(post_id).await;

		self.status = DetailStatus::Idle;

		match result {
			Ok(post) if post.id == post_id => {
				self.post = Some(post);
				self.error = None;

				Ok(())
			},
			Ok(post) => {
				let err = Error::MalformedResponse {
					message: format!("Requested post {post_id} but received post {}.", post.id),
				};

				self.error = Some(err.to_string());

				Err(err)
			},
			Err(err) => {
				tracing::warn!(error = %err, post_id, "Post detail fetch failed.");

				self.error = Some(err.to_string());

				Err(err)
			},
		}
	}

	/// Appends a user's vote to the loaded post so its score reflects it right away.
	pub fn add_user_compliance(&mut self, vote: &ComplianceVote) -> Result<()> {
		let Some(post) = self.post.as_mut() else {
			return Err(Error::InvalidRequest { message: "No post is loaded.".to_string() });
		};

		if post.id != vote.post_id {
			return Err(Error::InvalidRequest {
				message: format!("Vote targets post {} but post {} is loaded.", vote.post_id, post.id),
			});
		}

		post.user_compliances.push(ComplianceRecord {
			post_id: Some(vote.post_id),
			fischer_id: Some(vote.fischer_id),
			compliance: vote.compliance.value() as f64,
		});

		Ok(())
	}
}

impl Default for PostDetail {
	fn default() -> Self {
		Self::new()
	}
}
