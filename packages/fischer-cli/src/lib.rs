//! Command-line surface shared by the Fischer binaries.

use clap::builder::{
	Styles,
	styling::{AnsiColor, Color, Effects, Style},
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const ABOUT: &str = "Browse the Fischer truth-scored post feed from a terminal.";

const ACCENT: Color = Color::Ansi(AnsiColor::Blue);

/// Help colors for every Fischer command. Section headers and flags share the accent color so
/// the feed, search and vote options read as one group.
pub fn styles() -> Styles {
	let accent = Style::new().fg_color(Some(ACCENT));

	Styles::styled()
		.header(accent.effects(Effects::BOLD | Effects::UNDERLINE))
		.usage(accent.effects(Effects::BOLD))
		.literal(accent)
		.placeholder(AnsiColor::Magenta.on_default())
		.error(AnsiColor::Red.on_default() | Effects::BOLD)
		.valid(AnsiColor::Green.on_default())
		.invalid(AnsiColor::Yellow.on_default() | Effects::BOLD)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn headers_and_flags_share_the_accent() {
		let styles = styles();

		assert_eq!(styles.get_header().get_fg_color(), Some(ACCENT));
		assert_eq!(styles.get_literal().get_fg_color(), Some(ACCENT));
		assert!(styles.get_header().get_effects().contains(Effects::UNDERLINE));
		assert_ne!(styles.get_placeholder().get_fg_color(), Some(ACCENT));
	}
}
