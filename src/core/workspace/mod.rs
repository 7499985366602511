use crate::core::error::ApplyError;
use std::path::{Path, PathBuf};

/// Directory names that anchor a fetch URL inside the multi-repo checkout.
const WORKSPACE_MARKERS: &[&str] = &["android", "platform"];

/// Derive the local repository path for a fetch URL.
///
/// The rightmost marker occurrence wins; everything after it (minus a
/// leading separator) is the repository's path relative to the workspace
/// root. Pure function, no filesystem access.
pub fn derive_repo_path(
    fetch_url: &str,
    workspace_root: Option<&Path>,
) -> Result<PathBuf, ApplyError> {
    let marker_end = WORKSPACE_MARKERS
        .iter()
        .filter_map(|marker| fetch_url.rfind(marker).map(|pos| pos + marker.len()))
        .max()
        .ok_or_else(|| ApplyError::UnresolvablePath {
            fetch_url: fetch_url.to_string(),
        })?;

    let relative = fetch_url[marker_end..].trim_start_matches('/');

    Ok(match workspace_root {
        Some(root) => root.join(relative),
        None => PathBuf::from(relative),
    })
}
