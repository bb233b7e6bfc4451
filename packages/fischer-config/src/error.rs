use std::path::{Path, PathBuf};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reasons a Fischer feed config could not be turned into a [`crate::Config`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Cannot open feed config {path:?}: {source}.")]
	Unreadable {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("Feed config {path:?} is not valid TOML: {source}")]
	Malformed {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
	#[error("Invalid feed config: {message}")]
	Validation { message: String },
}
impl Error {
	/// File the error came from. Validation errors concern the parsed values only.
	pub fn path(&self) -> Option<&Path> {
		match self {
			Self::Unreadable { path, .. } | Self::Malformed { path, .. } => Some(path),
			Self::Validation { .. } => None,
		}
	}
}
