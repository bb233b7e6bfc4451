use serde_json::Value;

use fischer_domain::SearchState;

use crate::{Error, HttpBackend, Result};

impl HttpBackend {
	pub async fn start_search(&self, query: &str) -> Result<SearchState> {
		let body = serde_json::json!({ "query": query });
		let res = self.client().post(self.url("/api/search")).json(&body).send().await?;
		let json: Value = res.error_for_status()?.json().await?;

		parse_search_state(json)
	}

	pub async fn continue_search(&self, state: &SearchState) -> Result<SearchState> {
		let res = self.client().post(self.url("/api/search/continue")).json(state).send().await?;
		let json: Value = res.error_for_status()?.json().await?;

		parse_search_state(json)
	}
}

pub fn parse_search_state(json: Value) -> Result<SearchState> {
	if !json.is_object() {
		return Err(Error::InvalidResponse {
			message: "Search response must be a JSON object.".to_string(),
		});
	}

	let state: SearchState = crate::decode(json, "search")?;

	state.validate().map_err(|err| Error::InvalidResponse { message: err.to_string() })?;

	Ok(state)
}

#[cfg(test)]
mod tests {
	use fischer_domain::Cursor;

	use super::*;

	#[test]
	fn parses_search_state() {
		let json = serde_json::json!({
			"query": "bridge",
			"searchResults": [
				{ "id": 11, "assertion": "x" },
				{ "id": 12, "assertion": "y" }
			],
			"searchCursor": 12
		});
		let state = parse_search_state(json).expect("parse failed");

		assert_eq!(state.search_cursor, Some(Cursor(12)));
		assert!(state.is_active());
	}

	#[test]
	fn rejects_non_object_payload() {
		assert!(matches!(
			parse_search_state(serde_json::json!([1, 2])),
			Err(Error::InvalidResponse { .. })
		));
	}
}
