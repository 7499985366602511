use crate::core::config::Credentials;
use crate::core::error::ApplyError;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use url::Url;

/// Anti-XSSI guard Gerrit prepends to every JSON response body.
const XSSI_GUARD: &str = ")]}'";

/// Detail options requested alongside each change lookup.
const CHANGE_QUERY_OPTIONS: &[&str] = &[
    "CURRENT_REVISION",
    "CURRENT_COMMIT",
    "CURRENT_FILES",
    "DOWNLOAD_COMMANDS",
];

/// Exact upstream location and ref of one change's current revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CherryPickInstruction {
    pub fetch_url: String,
    pub git_ref: String,
}

/// Resolves a change id to the instruction needed to fetch it.
///
/// Object-safe so orchestration tests can substitute a deterministic stub
/// for the network round trip.
#[async_trait]
pub trait ChangeResolver: Send + Sync {
    async fn resolve(&self, change_id: &str) -> Result<CherryPickInstruction, ApplyError>;
}

#[derive(Debug, Deserialize)]
struct ChangeInfo {
    current_revision: Option<String>,

    #[serde(default)]
    revisions: HashMap<String, RevisionInfo>,
}

#[derive(Debug, Deserialize)]
struct RevisionInfo {
    #[serde(default)]
    fetch: HashMap<String, FetchInfo>,
}

#[derive(Debug, Deserialize)]
struct FetchInfo {
    #[serde(default)]
    commands: HashMap<String, String>,
}

/// Authenticated read-only client for the Gerrit changes endpoint.
///
/// One instance is shared by all concurrent workers; the underlying
/// `reqwest::Client` pools connections and the credentials are never
/// mutated after construction.
pub struct GerritClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl GerritClient {
    pub fn new(base_url: Url, credentials: Credentials) -> Self {
        GerritClient {
            http: reqwest::Client::new(),
            base_url,
            credentials,
        }
    }

    fn changes_url(&self, change_id: &str) -> String {
        let mut url = format!(
            "{}/a/changes/?q={}",
            self.base_url.as_str().trim_end_matches('/'),
            change_id
        );
        for option in CHANGE_QUERY_OPTIONS {
            url.push_str("&o=");
            url.push_str(option);
        }
        url
    }

    async fn query(&self, change_id: &str) -> Result<String, ApplyError> {
        let response = self
            .http
            .get(self.changes_url(change_id))
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApplyError::RemoteQuery {
                change_id: change_id.to_string(),
                status,
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl ChangeResolver for GerritClient {
    async fn resolve(&self, change_id: &str) -> Result<CherryPickInstruction, ApplyError> {
        let body = self.query(change_id).await?;

        let changes: Vec<ChangeInfo> = serde_json::from_str(strip_xssi_guard(&body))
            .map_err(|e| malformed(change_id, format!("invalid JSON: {e}")))?;
        let change = changes
            .into_iter()
            .next()
            .ok_or_else(|| malformed(change_id, "no change matched the query"))?;

        let current = change
            .current_revision
            .ok_or_else(|| malformed(change_id, "missing current_revision"))?;
        let revision = change
            .revisions
            .get(&current)
            .ok_or_else(|| malformed(change_id, format!("missing revision entry {current}")))?;
        let ssh = revision
            .fetch
            .get("ssh")
            .ok_or_else(|| malformed(change_id, "no ssh fetch info"))?;
        let command = ssh
            .commands
            .get("Cherry Pick")
            .ok_or_else(|| malformed(change_id, "no Cherry Pick download command"))?;

        parse_fetch_command(command)
            .ok_or_else(|| malformed(change_id, format!("unparseable fetch command '{command}'")))
    }
}

/// Strip the anti-XSSI guard if the server prepended one. The JSON parser
/// tolerates the leftover newline.
fn strip_xssi_guard(body: &str) -> &str {
    body.strip_prefix(XSSI_GUARD).unwrap_or(body)
}

/// Pull the URL and ref out of a `git fetch <url> <ref> ...` command
/// string. Only the two tokens after the leading verb pair matter.
fn parse_fetch_command(command: &str) -> Option<CherryPickInstruction> {
    let re = Regex::new(r"(?:\w+ \w+) (\S+) (\S+)").unwrap();
    let captures = re.captures(command)?;
    Some(CherryPickInstruction {
        fetch_url: captures[1].to_string(),
        git_ref: captures[2].to_string(),
    })
}

fn malformed(change_id: &str, detail: impl Into<String>) -> ApplyError {
    ApplyError::MalformedResponse {
        change_id: change_id.to_string(),
        detail: detail.into(),
    }
}
