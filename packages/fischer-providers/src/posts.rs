use serde_json::Value;

use fischer_domain::{Cursor, FeedPage, Post, PostId};

use crate::{Error, HttpBackend, Result};

impl HttpBackend {
	pub async fn fetch_page(&self, cursor: Cursor) -> Result<FeedPage> {
		let res = self.client().get(self.url(&format!("/api/posts/request/{cursor}"))).send().await?;
		let json: Value = res.error_for_status()?.json().await?;

		parse_feed_page(json)
	}

	pub async fn fetch_post(&self, post_id: PostId) -> Result<Post> {
		let res = self.client().get(self.url(&format!("/api/posts/{post_id}"))).send().await?;
		let json: Value = res.error_for_status()?.json().await?;

		parse_post(json)
	}
}

pub fn parse_feed_page(json: Value) -> Result<FeedPage> {
	if json.get("posts").and_then(Value::as_array).is_none() {
		return Err(Error::InvalidResponse {
			message: "Feed page response is missing posts array.".to_string(),
		});
	}
	if json.get("newCursor").map(Value::is_null).unwrap_or(true) {
		return Err(Error::InvalidResponse {
			message: "Feed page response is missing newCursor.".to_string(),
		});
	}

	let page: FeedPage = crate::decode(json, "feed page")?;

	page.validate().map_err(|err| Error::InvalidResponse { message: err.to_string() })?;

	Ok(page)
}

pub fn parse_post(json: Value) -> Result<Post> {
	let post: Post = crate::decode(json, "post")?;

	post.validate().map_err(|err| Error::InvalidResponse { message: err.to_string() })?;

	Ok(post)
}
