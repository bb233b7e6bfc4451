use serde::{Deserialize, Serialize};

use crate::{PostId, UserId};

/// A user's verdict on an assertion. Encoded on the wire as -1, 0 or 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Compliance {
	False,
	Subjective,
	True,
}
impl Compliance {
	pub fn value(self) -> i64 {
		match self {
			Self::False => -1,
			Self::Subjective => 0,
			Self::True => 1,
		}
	}
}

impl TryFrom<i64> for Compliance {
	type Error = String;

	fn try_from(value: i64) -> Result<Self, Self::Error> {
		match value {
			-1 => Ok(Self::False),
			0 => Ok(Self::Subjective),
			1 => Ok(Self::True),
			other => Err(format!("Compliance must be -1, 0 or 1, got {other}.")),
		}
	}
}

impl From<Compliance> for i64 {
	fn from(value: Compliance) -> Self {
		value.value()
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceVote {
	pub post_id: PostId,
	pub fischer_id: UserId,
	pub compliance: Compliance,
}
