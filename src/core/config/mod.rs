mod loader;

pub use loader::ConfigLoader;

use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

/// Fully resolved run options, read-only after startup and shared by every
/// worker without further synchronization.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Common parent directory of all component repositories. `None` means
    /// the process already runs from the workspace root.
    pub workspace_root: Option<PathBuf>,

    /// Branch to create once per repository that receives a cherry-pick.
    pub new_branch: Option<String>,

    /// Base URL of the Gerrit server.
    pub base_url: Url,

    /// Credentials for the authenticated changes query.
    pub credentials: Credentials,

    /// Process URLs one at a time instead of fanning out.
    pub sequential: bool,
}

/// HTTP basic-auth credentials for the Gerrit API.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// On-disk configuration (`applier.toml` in the workspace root). Every
/// field is optional; CLI flags and environment variables take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub gerrit: GerritSection,

    #[serde(default)]
    pub apply: ApplySection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GerritSection {
    /// Base URL of the Gerrit server.
    pub url: Option<String>,

    /// Account used for the changes query.
    pub username: Option<String>,

    /// HTTP password for the account.
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplySection {
    /// Root the component repositories are checked out under.
    pub workspace_root: Option<PathBuf>,

    /// Branch created in every repository before cherry-picking.
    pub new_branch: Option<String>,
}
