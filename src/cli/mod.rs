pub mod args;
pub mod commands;

pub use args::ApplyArgs;

use clap::Parser;

#[derive(Parser)]
#[command(name = "applier")]
#[command(version = crate::VERSION)]
#[command(about = "Automatically apply cherry-picks to multiple repos at the same time.")]
#[command(
    after_long_help = "Typical flow: collect review URLs into a file, export GERRIT_USERNAME and GERRIT_PASSWORD, then run applier against the workspace root."
)]
pub struct Args {
    #[command(flatten)]
    pub apply: ApplyArgs,
}

pub async fn run(args: Args) -> crate::Result<()> {
    commands::apply(args.apply).await
}
