use crate::core::error::ApplyError;
use async_trait::async_trait;
use std::path::Path;
use std::process::Output;
use tokio::process::Command;

/// Black-box version-control operations the applier needs.
///
/// Kept behind a trait so orchestration tests can substitute a recording
/// stub for the real git binary.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Create `branch` at `repo` and switch to it.
    async fn create_branch(&self, repo: &Path, branch: &str) -> Result<(), ApplyError>;

    /// Whether `branch` already exists at `repo`.
    async fn branch_exists(&self, repo: &Path, branch: &str) -> Result<bool, ApplyError>;

    /// Fetch `git_ref` from `url` into `repo`, landing on FETCH_HEAD.
    async fn fetch_ref(&self, repo: &Path, url: &str, git_ref: &str) -> Result<(), ApplyError>;

    /// Cherry-pick the most recently fetched head onto the current position.
    async fn cherry_pick_fetch_head(&self, repo: &Path) -> Result<(), ApplyError>;
}

/// Runs git as a subprocess. Arguments are passed as a list, never through
/// a shell.
#[derive(Default)]
pub struct GitClient;

impl GitClient {
    pub fn new() -> Self {
        GitClient
    }

    async fn run(&self, repo: &Path, operation: &str, args: &[&str]) -> Result<Output, ApplyError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(repo)
            .output()
            .await
            .map_err(|e| ApplyError::VersionControl {
                operation: operation.to_string(),
                path: repo.to_path_buf(),
                detail: format!("failed to execute git: {e}"),
            })?;

        if !output.status.success() {
            return Err(ApplyError::VersionControl {
                operation: operation.to_string(),
                path: repo.to_path_buf(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }
}

#[async_trait]
impl VersionControl for GitClient {
    async fn create_branch(&self, repo: &Path, branch: &str) -> Result<(), ApplyError> {
        self.run(repo, "create-branch", &["checkout", "-b", branch])
            .await
            .map(|_| ())
    }

    async fn branch_exists(&self, repo: &Path, branch: &str) -> Result<bool, ApplyError> {
        let output = self
            .run(repo, "branch-list", &["branch", "--list", branch])
            .await?;
        Ok(!output.stdout.is_empty())
    }

    async fn fetch_ref(&self, repo: &Path, url: &str, git_ref: &str) -> Result<(), ApplyError> {
        self.run(repo, "fetch", &["fetch", url, git_ref])
            .await
            .map(|_| ())
    }

    async fn cherry_pick_fetch_head(&self, repo: &Path) -> Result<(), ApplyError> {
        self.run(repo, "cherry-pick", &["cherry-pick", "FETCH_HEAD"])
            .await
            .map(|_| ())
    }
}
