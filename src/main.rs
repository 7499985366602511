use applier::cli::{self, Args};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    applier::logging::init()?;
    cli::run(args).await
}
