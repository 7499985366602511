use applier::core::config::{Credentials, RunConfig};
use applier::core::error::ApplyError;
use applier::core::gerrit::{ChangeResolver, CherryPickInstruction};
use applier::core::git::VersionControl;
use applier::core::orchestrator::Orchestrator;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

/// Deterministic stand-in for the Gerrit round trip.
struct StubResolver {
    /// Change id that answers with HTTP 404.
    fail_for: Option<&'static str>,
    /// Route every change into one repository instead of one per change.
    single_repo: bool,
}

impl StubResolver {
    fn new() -> Self {
        StubResolver {
            fail_for: None,
            single_repo: false,
        }
    }
}

#[async_trait]
impl ChangeResolver for StubResolver {
    async fn resolve(&self, change_id: &str) -> Result<CherryPickInstruction, ApplyError> {
        if self.fail_for == Some(change_id) {
            return Err(ApplyError::RemoteQuery {
                change_id: change_id.to_string(),
                status: StatusCode::NOT_FOUND,
            });
        }

        let repo = if self.single_repo {
            "frameworks/base".to_string()
        } else {
            format!("repo{change_id}")
        };
        Ok(CherryPickInstruction {
            fetch_url: format!("ssh://gerrit.example.com:29418/platform/{repo}"),
            git_ref: format!("refs/changes/00/{change_id}/1"),
        })
    }
}

/// Records every version-control invocation instead of running git.
#[derive(Default)]
struct CountingVcs {
    creates: AtomicUsize,
    fetches: AtomicUsize,
    picks: AtomicUsize,
    created_paths: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl VersionControl for CountingVcs {
    async fn create_branch(&self, repo: &Path, _branch: &str) -> Result<(), ApplyError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.created_paths.lock().unwrap().push(repo.to_path_buf());
        Ok(())
    }

    async fn branch_exists(&self, _repo: &Path, _branch: &str) -> Result<bool, ApplyError> {
        Ok(false)
    }

    async fn fetch_ref(&self, _repo: &Path, _url: &str, _ref: &str) -> Result<(), ApplyError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn cherry_pick_fetch_head(&self, _repo: &Path) -> Result<(), ApplyError> {
        self.picks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn config(new_branch: Option<&str>) -> Arc<RunConfig> {
    Arc::new(RunConfig {
        workspace_root: Some(PathBuf::from("/src/aosp")),
        new_branch: new_branch.map(str::to_string),
        base_url: Url::parse("https://gerrit.example.com").unwrap(),
        credentials: Credentials {
            username: "ci".into(),
            password: "secret".into(),
        },
        sequential: false,
    })
}

fn urls(ids: &[&str]) -> Vec<String> {
    ids.iter()
        .map(|id| {
            if id.is_empty() {
                String::new()
            } else {
                format!("https://gerrit.example.com/c/platform/repo{id}/+/{id}")
            }
        })
        .collect()
}

/// Multiset of (url, success/error tag) pairs, comparable across runs.
fn outcome_tags(outcomes: &[applier::core::ApplyOutcome]) -> BTreeMap<(String, String), usize> {
    let mut tags = BTreeMap::new();
    for outcome in outcomes {
        let tag = match &outcome.result {
            Ok(applied) => format!("ok:{}", applied.repo_path.display()),
            Err(err) => match err {
                ApplyError::RemoteQuery { status, .. } => format!("remote-query:{status}"),
                other => format!("other:{other}"),
            },
        };
        tags.entry((outcome.url.clone(), tag))
            .and_modify(|n| *n += 1)
            .or_insert(1usize);
    }
    tags
}

#[tokio::test]
async fn test_two_repos_with_blank_line_create_each_branch_once() {
    for sequential in [false, true] {
        let vcs = Arc::new(CountingVcs::default());
        let orchestrator = Orchestrator::new(
            config(Some("topic/picks")),
            Arc::new(StubResolver::new()),
            Arc::clone(&vcs) as Arc<dyn VersionControl>,
        );

        let outcomes = orchestrator.run(&urls(&["111", "", "222"]), sequential).await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.is_success()));
        assert_eq!(vcs.creates.load(Ordering::SeqCst), 2);
        assert_eq!(vcs.picks.load(Ordering::SeqCst), 2);

        let mut created = vcs.created_paths.lock().unwrap().clone();
        created.sort();
        assert_eq!(
            created,
            vec![
                PathBuf::from("/src/aosp/repo111"),
                PathBuf::from("/src/aosp/repo222"),
            ]
        );
    }
}

#[tokio::test]
async fn test_same_repo_gets_a_single_branch_creation() {
    let vcs = Arc::new(CountingVcs::default());
    let resolver = StubResolver {
        fail_for: None,
        single_repo: true,
    };
    let orchestrator = Orchestrator::new(
        config(Some("topic/picks")),
        Arc::new(resolver),
        Arc::clone(&vcs) as Arc<dyn VersionControl>,
    );

    let outcomes = orchestrator
        .run(&urls(&["111", "222", "333", "444"]), false)
        .await;

    assert!(outcomes.iter().all(|o| o.is_success()));
    assert_eq!(vcs.creates.load(Ordering::SeqCst), 1);
    assert_eq!(vcs.picks.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_no_branch_configured_means_no_branch_creation() {
    let vcs = Arc::new(CountingVcs::default());
    let orchestrator = Orchestrator::new(
        config(None),
        Arc::new(StubResolver::new()),
        Arc::clone(&vcs) as Arc<dyn VersionControl>,
    );

    orchestrator.run(&urls(&["111", "222"]), false).await;

    assert_eq!(vcs.creates.load(Ordering::SeqCst), 0);
    assert_eq!(vcs.picks.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_remote_failure_is_isolated_to_its_url() {
    let vcs = Arc::new(CountingVcs::default());
    let resolver = StubResolver {
        fail_for: Some("222"),
        single_repo: false,
    };
    let orchestrator = Orchestrator::new(
        config(Some("topic/picks")),
        Arc::new(resolver),
        Arc::clone(&vcs) as Arc<dyn VersionControl>,
    );

    let outcomes = orchestrator.run(&urls(&["111", "222", "333"]), false).await;

    assert_eq!(outcomes.len(), 3);
    let failed: Vec<_> = outcomes.iter().filter(|o| !o.is_success()).collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].url.contains("222"));
    assert!(matches!(
        failed[0].result,
        Err(ApplyError::RemoteQuery { .. })
    ));

    // Siblings completed their picks despite the failure.
    assert_eq!(vcs.picks.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_sequential_and_concurrent_runs_agree() {
    let resolver = || {
        Arc::new(StubResolver {
            fail_for: Some("222"),
            single_repo: false,
        })
    };
    let input = urls(&["111", "222", "", "333", "444"]);

    let concurrent = Orchestrator::new(
        config(Some("topic/picks")),
        resolver(),
        Arc::new(CountingVcs::default()) as Arc<dyn VersionControl>,
    )
    .run(&input, false)
    .await;
    let sequential = Orchestrator::new(
        config(Some("topic/picks")),
        resolver(),
        Arc::new(CountingVcs::default()) as Arc<dyn VersionControl>,
    )
    .run(&input, true)
    .await;

    assert_eq!(outcome_tags(&concurrent), outcome_tags(&sequential));
}
