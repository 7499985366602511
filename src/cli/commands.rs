use crate::cli::ApplyArgs;
use crate::core::{ApplyOutcome, ConfigLoader, GerritClient, GitClient, Orchestrator};
use crate::Result;
use anyhow::{anyhow, bail};
use std::sync::Arc;

/// Run the cherry-pick batch described by the CLI arguments.
///
/// Configuration problems and an unreadable URL file abort the run before
/// any work starts; per-URL failures are collected and reported at the
/// end, and only turn into a non-zero exit code once every worker is done.
pub async fn apply(args: ApplyArgs) -> Result<()> {
    let config = Arc::new(ConfigLoader::resolve(&args)?);

    let input = tokio::fs::read_to_string(&args.filepath)
        .await
        .map_err(|e| anyhow!("cannot read url list {}: {e}", args.filepath.display()))?;
    let urls: Vec<String> = input.lines().map(str::to_string).collect();

    let resolver = Arc::new(GerritClient::new(
        config.base_url.clone(),
        config.credentials.clone(),
    ));
    let orchestrator = Orchestrator::new(Arc::clone(&config), resolver, Arc::new(GitClient::new()));

    let outcomes = orchestrator.run(&urls, config.sequential).await;
    report(&outcomes)
}

fn report(outcomes: &[ApplyOutcome]) -> Result<()> {
    let failed: Vec<&ApplyOutcome> = outcomes.iter().filter(|o| !o.is_success()).collect();

    println!(
        "applied {}/{} change(s)",
        outcomes.len() - failed.len(),
        outcomes.len()
    );
    for outcome in &failed {
        if let Err(err) = &outcome.result {
            eprintln!("  {}: {}", outcome.url, err);
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        bail!("{} change(s) failed to apply", failed.len())
    }
}
