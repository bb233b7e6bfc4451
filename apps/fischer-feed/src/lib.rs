use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fischer_domain::{Cursor, UserId};
use fischer_feed::{EngineSettings, FeedEngine, ScoreView, presenter};
use fischer_providers::HttpBackend;

#[derive(Debug, Parser)]
#[command(
	version = fischer_cli::VERSION,
	about = fischer_cli::ABOUT,
	rename_all = "kebab",
	styles = fischer_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Signed-in user whose votes gate the voting affordance.
	#[arg(long, value_name = "N")]
	pub user_id: Option<UserId>,
	/// Continuations to request after the first page.
	#[arg(long, value_name = "N", default_value_t = 1)]
	pub pages: u32,
	#[arg(long, value_name = "QUERY")]
	pub search: Option<String>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = fischer_config::load(&args.config)?;

	init_tracing(&config)?;

	let backend = Arc::new(HttpBackend::new(&config.backend)?);
	let settings = EngineSettings::from_config(&config);
	let engine =
		FeedEngine::bootstrap(settings, backend, Cursor(config.feed.initial_cursor)).await?;

	if args.user_id.is_some() {
		engine.set_identity(args.user_id).await?;
	}
	if let Some(query) = args.search.as_deref() {
		engine.begin_search(query).await?;
	}

	for page in 1..=args.pages {
		let Some(handle) = engine.sentinel_visibility(true) else {
			tracing::info!(page, "Nothing left to load.");

			break;
		};

		handle.await?;
		engine.sentinel_visibility(false);
	}

	let posts = engine.visible_posts();

	tracing::info!(
		mode = engine.mode().as_str(),
		posts = posts.len(),
		cursor = %engine.cursor(),
		"Feed ready."
	);

	for post in &posts {
		let vote = engine.vote_for(post.id).map(|entry| entry.vote.compliance.value());

		tracing::info!(
			post_id = post.id,
			score = %ScoreView::of(post),
			topic = %post.topic_name,
			host = presenter::host_label(post).unwrap_or("-"),
			author = presenter::author_label(post),
			comments = %presenter::comment_label(post.comment_count),
			vote,
			assertion = %post.assertion,
			"Post."
		);
	}

	Ok(())
}

fn init_tracing(config: &fischer_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).try_init().map_err(|err| {
		color_eyre::eyre::eyre!("Failed to install the tracing subscriber: {err}.")
	})?;

	Ok(())
}
