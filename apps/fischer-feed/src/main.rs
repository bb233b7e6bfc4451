use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = fischer_feed_app::Args::parse();

	fischer_feed_app::run(args).await
}
