use crate::core::apply::{ApplyExecutor, ApplyOutcome};
use crate::core::branch::BranchTable;
use crate::core::config::RunConfig;
use crate::core::error::ApplyError;
use crate::core::gerrit::ChangeResolver;
use crate::core::git::VersionControl;
use futures::future::join_all;
use std::sync::Arc;
use tracing::info;

/// Fans the URL list out to apply workers and collects every outcome.
pub struct Orchestrator {
    executor: Arc<ApplyExecutor>,
}

impl Orchestrator {
    /// Build the worker stack around a resolved configuration. The branch
    /// table is created here and shared with every worker for the run.
    pub fn new(
        config: Arc<RunConfig>,
        resolver: Arc<dyn ChangeResolver>,
        vcs: Arc<dyn VersionControl>,
    ) -> Self {
        let branches = Arc::new(BranchTable::new());
        Orchestrator {
            executor: Arc::new(ApplyExecutor::new(config, resolver, vcs, branches)),
        }
    }

    /// Process every non-blank URL and return one outcome per URL.
    ///
    /// Concurrent mode spawns every worker before awaiting any of them;
    /// outcomes carry their URL, so no cross-outcome ordering is promised.
    /// Sequential mode preserves strict input order.
    pub async fn run(&self, urls: &[String], sequential: bool) -> Vec<ApplyOutcome> {
        let urls: Vec<&String> = urls.iter().filter(|url| !url.trim().is_empty()).collect();
        info!(count = urls.len(), sequential, "processing change urls");

        if sequential {
            let mut outcomes = Vec::with_capacity(urls.len());
            for url in urls {
                outcomes.push(self.executor.apply(url).await);
            }
            return outcomes;
        }

        let mut spawned = Vec::with_capacity(urls.len());
        for url in urls {
            let executor = Arc::clone(&self.executor);
            let owned = url.clone();
            spawned.push((
                url.clone(),
                tokio::spawn(async move { executor.apply(&owned).await }),
            ));
        }

        let (urls, handles): (Vec<_>, Vec<_>) = spawned.into_iter().unzip();
        urls.into_iter()
            .zip(join_all(handles).await)
            .map(|(url, joined)| match joined {
                Ok(outcome) => outcome,
                // A panicked worker still yields an outcome for its URL.
                Err(err) => ApplyOutcome {
                    url,
                    result: Err(ApplyError::Internal(format!("worker task failed: {err}"))),
                },
            })
            .collect()
    }
}
