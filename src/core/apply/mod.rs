use crate::core::branch::BranchTable;
use crate::core::config::RunConfig;
use crate::core::error::ApplyError;
use crate::core::gerrit::ChangeResolver;
use crate::core::git::VersionControl;
use crate::core::workspace;
use regex::Regex;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of processing one review URL.
#[derive(Debug)]
pub struct ApplyOutcome {
    pub url: String,
    pub result: Result<AppliedChange, ApplyError>,
}

impl ApplyOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// What a successful application touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChange {
    pub change_id: String,
    pub repo_path: PathBuf,
}

/// Extract the change id (first numeric token) from a review URL.
pub fn extract_change_id(url: &str) -> Result<&str, ApplyError> {
    let re = Regex::new(r"\d+").unwrap();
    re.find(url)
        .map(|m| m.as_str())
        .ok_or_else(|| ApplyError::NoChangeIdFound {
            url: url.to_string(),
        })
}

/// Applies one review URL end to end. One instance is shared by every
/// worker; all of its state is immutable or internally synchronized.
pub struct ApplyExecutor {
    config: Arc<RunConfig>,
    resolver: Arc<dyn ChangeResolver>,
    vcs: Arc<dyn VersionControl>,
    branches: Arc<BranchTable>,
}

impl ApplyExecutor {
    pub fn new(
        config: Arc<RunConfig>,
        resolver: Arc<dyn ChangeResolver>,
        vcs: Arc<dyn VersionControl>,
        branches: Arc<BranchTable>,
    ) -> Self {
        ApplyExecutor {
            config,
            resolver,
            vcs,
            branches,
        }
    }

    /// Process one URL; a failure here never affects other URLs in flight.
    pub async fn apply(&self, url: &str) -> ApplyOutcome {
        let result = self.apply_inner(url).await;
        match &result {
            Ok(applied) => info!(
                url,
                change = %applied.change_id,
                repo = %applied.repo_path.display(),
                "cherry-pick applied"
            ),
            Err(err) => error!(url, %err, "cherry-pick failed"),
        }

        ApplyOutcome {
            url: url.to_string(),
            result,
        }
    }

    async fn apply_inner(&self, url: &str) -> Result<AppliedChange, ApplyError> {
        let change_id = extract_change_id(url)?;
        let instruction = self.resolver.resolve(change_id).await?;
        let repo_path = workspace::derive_repo_path(
            &instruction.fetch_url,
            self.config.workspace_root.as_deref(),
        )?;

        if let Some(branch) = &self.config.new_branch {
            // A lost race or pre-existing branch must not block the pick.
            if let Err(err) = self
                .branches
                .ensure_branch(self.vcs.as_ref(), &repo_path, branch)
                .await
            {
                warn!(
                    repo = %repo_path.display(),
                    %branch,
                    %err,
                    "branch creation failed, continuing with cherry-pick"
                );
            }
        }

        self.vcs
            .fetch_ref(&repo_path, &instruction.fetch_url, &instruction.git_ref)
            .await?;
        self.vcs.cherry_pick_fetch_head(&repo_path).await?;

        Ok(AppliedChange {
            change_id: change_id.to_string(),
            repo_path,
        })
    }
}
