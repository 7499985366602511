use super::{Credentials, FileConfig, RunConfig};
use crate::cli::ApplyArgs;
use crate::core::error::ApplyError;
use std::env;
use std::path::{Path, PathBuf};
use url::Url;

const CONFIG_FILE_NAME: &str = "applier.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve the effective run configuration.
    ///
    /// Precedence per value: CLI argument, then environment variable, then
    /// `applier.toml` in the workspace root (or current directory when no
    /// root was given). Missing credentials or a missing server URL abort
    /// the run before any work starts.
    pub fn resolve(args: &ApplyArgs) -> Result<RunConfig, ApplyError> {
        let config_path = args
            .workspace_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_FILE_NAME);
        let file = Self::load_from_file(&config_path)?.unwrap_or_default();

        let username = args
            .username
            .clone()
            .or_else(|| env::var("GERRIT_USERNAME").ok())
            .or_else(|| file.gerrit.username.clone())
            .ok_or_else(|| missing("username", "GERRIT_USERNAME"))?;

        let password = args
            .password
            .clone()
            .or_else(|| env::var("GERRIT_PASSWORD").ok())
            .or_else(|| file.gerrit.password.clone())
            .ok_or_else(|| missing("password", "GERRIT_PASSWORD"))?;

        let raw_url = args
            .gerrit_url
            .clone()
            .or_else(|| env::var("GERRIT_URL").ok())
            .or_else(|| file.gerrit.url.clone())
            .ok_or_else(|| missing("gerrit server url", "GERRIT_URL"))?;
        let base_url = Url::parse(&raw_url).map_err(|e| {
            ApplyError::Configuration(format!("invalid gerrit url '{raw_url}': {e}"))
        })?;

        let workspace_root = args
            .workspace_root
            .clone()
            .or_else(|| file.apply.workspace_root.clone());
        let new_branch = args
            .new_branch
            .clone()
            .or_else(|| file.apply.new_branch.clone());

        Ok(RunConfig {
            workspace_root,
            new_branch,
            base_url,
            credentials: Credentials { username, password },
            sequential: args.sequential,
        })
    }

    /// Load the optional config file. Returns `Ok(None)` when it does not
    /// exist.
    fn load_from_file(path: &Path) -> Result<Option<FileConfig>, ApplyError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content).map_err(|e| {
            ApplyError::Configuration(format!("failed to parse {}: {e}", path.display()))
        })?;

        Ok(Some(config))
    }
}

fn missing(what: &str, var: &str) -> ApplyError {
    ApplyError::Configuration(format!(
        "no {what} configured; pass it as an argument or export {var}"
    ))
}
