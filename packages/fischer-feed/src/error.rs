use fischer_domain::PostId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
	#[error("Fetch failed: {message}")]
	FetchFailure { message: String },
	#[error("Malformed response: {message}")]
	MalformedResponse { message: String },
	#[error("Fetch did not settle within {timeout_ms} ms.")]
	FetchTimeout { timeout_ms: u64 },
	#[error("No compliance data is available to compute truthiness.")]
	MissingComplianceData,
	#[error("A vote for post {post_id} is already recorded.")]
	DuplicateVoteAttempt { post_id: PostId },
	#[error("Voting requires a signed-in user.")]
	Unauthenticated,
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
}
impl From<fischer_providers::Error> for Error {
	fn from(err: fischer_providers::Error) -> Self {
		match err {
			fischer_providers::Error::InvalidResponse { message } => {
				Self::MalformedResponse { message }
			},
			fischer_providers::Error::SerdeJson(inner) => {
				Self::MalformedResponse { message: inner.to_string() }
			},
			fischer_providers::Error::Reqwest(inner) if inner.is_decode() => {
				Self::MalformedResponse { message: inner.to_string() }
			},
			fischer_providers::Error::Reqwest(inner) => {
				Self::FetchFailure { message: inner.to_string() }
			},
			fischer_providers::Error::InvalidConfig { message } => Self::InvalidRequest { message },
			fischer_providers::Error::InvalidHeaderName(inner) => {
				Self::InvalidRequest { message: inner.to_string() }
			},
			fischer_providers::Error::InvalidHeaderValue(inner) => {
				Self::InvalidRequest { message: inner.to_string() }
			},
		}
	}
}
