pub mod compliance;
pub mod posts;
pub mod search;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// JSON-over-HTTP client for the Fischer backend routes.
#[derive(Clone, Debug)]
pub struct HttpBackend {
	client: Client,
	api_base: String,
}
impl HttpBackend {
	pub fn new(cfg: &fischer_config::Backend) -> Result<Self> {
		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
			.build()?;

		Ok(Self { client, api_base: cfg.api_base.trim_end_matches('/').to_string() })
	}

	pub fn api_base(&self) -> &str {
		&self.api_base
	}

	pub(crate) fn url(&self, path: &str) -> String {
		format!("{}{path}", self.api_base)
	}

	pub(crate) fn client(&self) -> &Client {
		&self.client
	}
}

pub fn auth_headers(
	api_key: Option<&str>,
	default_headers: &Map<String, Value>,
) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(key) = api_key {
		headers.insert(AUTHORIZATION, format!("Bearer {key}").parse()?);
	}

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

pub(crate) fn decode<T>(json: Value, label: &str) -> Result<T>
where
	T: DeserializeOwned,
{
	serde_json::from_value(json)
		.map_err(|err| Error::InvalidResponse { message: format!("Malformed {label} response: {err}") })
}
