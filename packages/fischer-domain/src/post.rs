use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{PostId, UserId, ValidationError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
	pub id: PostId,
	pub assertion: String,
	#[serde(default)]
	pub ai_response: String,
	#[serde(default)]
	pub topic_name: String,
	#[serde(default)]
	pub website_article: Option<WebsiteArticle>,
	/// `None` once the owning account has been deleted.
	#[serde(default)]
	pub user: Option<Author>,
	#[serde(default)]
	pub user_compliances: Vec<ComplianceRecord>,
	#[serde(default)]
	pub expert_compliances: Vec<ComplianceRecord>,
	#[serde(default)]
	pub ai_compliance: Option<f64>,
	#[serde(default, rename = "comments", deserialize_with = "comment_count")]
	pub comment_count: u64,
}
impl Post {
	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.assertion.trim().is_empty() {
			return Err(ValidationError::EmptyAssertion { post_id: self.id });
		}
		if let Some(score) = self.ai_compliance {
			check_score(self.id, "aiCompliance", score)?;
		}

		for record in &self.user_compliances {
			check_score(self.id, "userCompliances.compliance", record.compliance)?;
		}
		for record in &self.expert_compliances {
			check_score(self.id, "expertCompliances.compliance", record.compliance)?;
		}

		Ok(())
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteArticle {
	#[serde(rename = "articleURL")]
	pub article_url: String,
	#[serde(default)]
	pub website: Option<Website>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Website {
	pub host_site: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Author {
	#[serde(default, alias = "fischerId")]
	pub id: Option<UserId>,
	pub name: String,
}

/// One vote stored on a post. Expert scores may be fractional, so the value is a real number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRecord {
	#[serde(default)]
	pub post_id: Option<PostId>,
	#[serde(default)]
	pub fischer_id: Option<UserId>,
	pub compliance: f64,
}
impl ComplianceRecord {
	pub fn new(compliance: f64) -> Self {
		Self { post_id: None, fischer_id: None, compliance }
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CommentsField {
	Count(u64),
	List(Vec<Value>),
}

fn comment_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
	D: Deserializer<'de>,
{
	let field = Option::<CommentsField>::deserialize(deserializer)?;

	Ok(match field {
		Some(CommentsField::Count(count)) => count,
		Some(CommentsField::List(items)) => items.len() as u64,
		None => 0,
	})
}

fn check_score(post_id: PostId, field: &'static str, value: f64) -> Result<(), ValidationError> {
	if !value.is_finite() {
		return Err(ValidationError::NonFinite { post_id, field });
	}
	if !(-1.0..=1.0).contains(&value) {
		return Err(ValidationError::OutOfRange { post_id, field, value });
	}

	Ok(())
}
