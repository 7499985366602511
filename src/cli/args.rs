use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
    /// File with one review URL per line (blank lines are skipped)
    #[arg(short = 'f', long, value_name = "FILE")]
    pub filepath: PathBuf,

    /// Gerrit user for this session (default: GERRIT_USERNAME env var)
    #[arg(short = 'u', long, value_name = "USER", help_heading = "Gerrit Access")]
    pub username: Option<String>,

    /// Gerrit HTTP password for this session (default: GERRIT_PASSWORD env var)
    #[arg(short = 'p', long, value_name = "PASSWORD", help_heading = "Gerrit Access")]
    pub password: Option<String>,

    /// Base URL of the Gerrit server (default: GERRIT_URL env var or applier.toml)
    #[arg(long, value_name = "URL", help_heading = "Gerrit Access")]
    pub gerrit_url: Option<String>,

    /// Branch to create in the repos where the cherry-picks take place
    #[arg(short = 'b', long, value_name = "BRANCH_NAME")]
    pub new_branch: Option<String>,

    /// Workspace root the repositories are checked out under (default: run from the workspace root)
    #[arg(short = 'w', long, value_name = "PATH")]
    pub workspace_root: Option<PathBuf>,

    /// Process URLs one at a time instead of concurrently
    #[arg(long)]
    pub sequential: bool,
}
