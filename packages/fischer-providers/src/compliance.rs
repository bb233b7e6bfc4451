use serde_json::Value;

use fischer_domain::{ComplianceVote, UserId};

use crate::{Error, HttpBackend, Result};

impl HttpBackend {
	pub async fn fetch_user_votes(&self, user_id: UserId) -> Result<Vec<ComplianceVote>> {
		let res = self.client().get(self.url(&format!("/api/usercompliance/{user_id}"))).send().await?;
		let json: Value = res.error_for_status()?.json().await?;

		parse_user_votes(json, user_id)
	}

	/// The acknowledgement body is not interpreted; a 2xx status is the confirmation.
	pub async fn submit_vote(&self, vote: &ComplianceVote) -> Result<()> {
		let res = self.client().post(self.url("/api/usercompliance")).json(vote).send().await?;

		res.error_for_status()?;

		tracing::debug!(post_id = vote.post_id, user_id = vote.fischer_id, "Vote accepted by backend.");

		Ok(())
	}
}

pub fn parse_user_votes(json: Value, user_id: UserId) -> Result<Vec<ComplianceVote>> {
	if !json.is_array() {
		return Err(Error::InvalidResponse {
			message: "User compliance response must be a JSON array.".to_string(),
		});
	}

	let votes: Vec<ComplianceVote> = crate::decode(json, "user compliance")?;

	if let Some(foreign) = votes.iter().find(|vote| vote.fischer_id != user_id) {
		return Err(Error::InvalidResponse {
			message: format!(
				"User compliance response for user {user_id} contains a vote by user {}.",
				foreign.fischer_id
			),
		});
	}

	Ok(votes)
}
