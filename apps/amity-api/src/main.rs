use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = amity_api::Args::parse();

	amity_api::run(args).await
}
