use reqwest::StatusCode;
use std::path::PathBuf;

/// Errors produced while applying a batch of cherry-picks.
///
/// Only `Configuration` aborts the whole run; every other variant is
/// recorded against the URL whose worker produced it and never cancels
/// sibling workers.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("gerrit query for change {change_id} failed with status {status}")]
    RemoteQuery {
        change_id: String,
        status: StatusCode,
    },

    #[error("unexpected response for change {change_id}: {detail}")]
    MalformedResponse { change_id: String, detail: String },

    #[error("no change id found in '{url}'")]
    NoChangeIdFound { url: String },

    #[error("no workspace marker in fetch url '{fetch_url}'")]
    UnresolvablePath { fetch_url: String },

    #[error("git {} in {} failed: {}", .operation, .path.display(), .detail)]
    VersionControl {
        operation: String,
        path: PathBuf,
        detail: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplyError {
    /// Whether this error must abort the whole run instead of one URL.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ApplyError::Configuration(_))
    }
}
