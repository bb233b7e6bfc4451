use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub backend: Backend,
	#[serde(default)]
	pub feed: Feed,
	#[serde(default)]
	pub votes: Votes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Backend {
	pub api_base: String,
	/// Optional. Sent as a bearer token when present.
	#[serde(default)]
	pub api_key: Option<String>,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Feed {
	/// Minimum spacing between two fetches started by the scroll sentinel.
	pub throttle_ms: u64,
	pub fetch_timeout_ms: u64,
	pub initial_cursor: i64,
}
impl Default for Feed {
	fn default() -> Self {
		Self { throttle_ms: 600, fetch_timeout_ms: 15_000, initial_cursor: 0 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Votes {
	pub max_submit_attempts: u32,
	pub retry_backoff_ms: u64,
}
impl Default for Votes {
	fn default() -> Self {
		Self { max_submit_attempts: 3, retry_backoff_ms: 500 }
	}
}
