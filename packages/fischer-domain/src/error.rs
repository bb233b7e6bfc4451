#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
	#[error("Post {post_id} has a non-finite {field}.")]
	NonFinite { post_id: crate::PostId, field: &'static str },
	#[error("Post {post_id} has {field} {value} outside -1.0..=1.0.")]
	OutOfRange { post_id: crate::PostId, field: &'static str, value: f64 },
	#[error("Post {post_id} has an empty assertion.")]
	EmptyAssertion { post_id: crate::PostId },
}
