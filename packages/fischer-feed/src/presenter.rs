use std::fmt;

use fischer_domain::{ComplianceRecord, Post};

use crate::{Error, Result};

const DELETED_USER: &str = "deleted user";
const BAND_THRESHOLD: f64 = 16.0;

/// Mean of the available compliance averages, scaled to a percentage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Truthiness(f64);
impl Truthiness {
	pub fn percent(self) -> f64 {
		self.0
	}

	/// Display band on the percentage rounded to a whole number.
	pub fn band(self) -> TruthBand {
		let rounded = self.0.round();

		if rounded >= BAND_THRESHOLD {
			TruthBand::Green
		} else if rounded <= -BAND_THRESHOLD {
			TruthBand::Red
		} else {
			TruthBand::Yellow
		}
	}
}

impl fmt::Display for Truthiness {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let rounded = (self.0 * 100.0).round() / 100.0;
		// Avoid rendering "-0%".
		let rounded = if rounded == 0.0 { 0.0 } else { rounded };

		write!(f, "{rounded}%")
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TruthBand {
	Green,
	Yellow,
	Red,
}

/// Truthiness as handed to the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScoreView {
	Score(Truthiness),
	Unavailable,
}
impl ScoreView {
	pub fn of(post: &Post) -> Self {
		match compute_truthiness(post) {
			Ok(score) => Self::Score(score),
			Err(_) => Self::Unavailable,
		}
	}
}

impl fmt::Display for ScoreView {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Score(score) => score.fmt(f),
			Self::Unavailable => f.write_str("n/a"),
		}
	}
}

/// Averages the AI score, the expert mean and the user mean, skipping whichever is absent.
pub fn compute_truthiness(post: &Post) -> Result<Truthiness> {
	let averages: Vec<f64> = [
		post.ai_compliance,
		average(&post.expert_compliances),
		average(&post.user_compliances),
	]
	.into_iter()
	.flatten()
	.collect();

	if averages.is_empty() {
		return Err(Error::MissingComplianceData);
	}

	let mean = averages.iter().sum::<f64>() / averages.len() as f64;

	Ok(Truthiness(mean * 100.0))
}

/// Site name with its first label removed, e.g. `www.example.com` becomes `example.com`.
pub fn host_label(post: &Post) -> Option<&str> {
	let host = post.website_article.as_ref()?.website.as_ref()?.host_site.as_str();

	Some(host.split_once('.').map(|(_, rest)| rest).unwrap_or(host))
}

pub fn author_label(post: &Post) -> &str {
	post.user.as_ref().map(|user| user.name.as_str()).unwrap_or(DELETED_USER)
}

pub fn comment_label(count: u64) -> String {
	if count == 1 { "1 comment".to_string() } else { format!("{count} comments") }
}

fn average(records: &[ComplianceRecord]) -> Option<f64> {
	if records.is_empty() {
		return None;
	}

	Some(records.iter().map(|record| record.compliance).sum::<f64>() / records.len() as f64)
}
