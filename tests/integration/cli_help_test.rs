use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_core_options() {
    Command::cargo_bin("applier")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--filepath"))
        .stdout(predicate::str::contains("--new-branch"))
        .stdout(predicate::str::contains("--workspace-root"))
        .stdout(predicate::str::contains("--sequential"));
}

#[test]
fn test_version_flag_prints_crate_version() {
    Command::cargo_bin("applier")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_filepath_is_an_error() {
    Command::cargo_bin("applier")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--filepath"));
}

#[test]
fn test_missing_url_file_aborts_the_run() {
    Command::cargo_bin("applier")
        .unwrap()
        .args(["--filepath", "/nonexistent/urls.txt"])
        .args(["--username", "jdoe", "--password", "hunter2"])
        .args(["--gerrit-url", "https://gerrit.example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/urls.txt"));
}
