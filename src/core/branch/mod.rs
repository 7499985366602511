use crate::core::error::ApplyError;
use crate::core::git::VersionControl;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// Tracks which repositories already had the target branch handled this
/// run.
///
/// Shared by every concurrent worker. The mutex spans the existence probe
/// and the creation, so the check-then-act is atomic: exactly one caller
/// per repository performs the attempt, the rest observe the recorded
/// entry and skip. Entries live until the run ends.
#[derive(Default)]
pub struct BranchTable {
    attempted: Mutex<HashSet<PathBuf>>,
}

impl BranchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `branch` at `repo` unless this run already attempted it.
    ///
    /// Returns whether this call performed the creation. The underlying
    /// create operation runs at most once per repository per run no matter
    /// how many workers race here; a branch left over from an earlier run
    /// is observed by the probe and skipped.
    pub async fn ensure_branch(
        &self,
        vcs: &dyn VersionControl,
        repo: &Path,
        branch: &str,
    ) -> Result<bool, ApplyError> {
        let mut attempted = self.attempted.lock().await;
        if !attempted.insert(repo.to_path_buf()) {
            debug!(repo = %repo.display(), branch, "branch already handled for repository");
            return Ok(false);
        }

        // The lock is intentionally held across the probe and creation so
        // later callers for this repository observe a finished attempt.
        if vcs.branch_exists(repo, branch).await? {
            debug!(repo = %repo.display(), branch, "branch already exists, skipping creation");
            return Ok(false);
        }

        vcs.create_branch(repo, branch).await?;
        Ok(true)
    }
}
