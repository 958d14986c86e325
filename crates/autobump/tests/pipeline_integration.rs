//! Pipeline integration tests.
//!
//! These tests drive the compiled binary against temporary checkouts and
//! event payloads to verify the decision flow end-to-end: classification,
//! the prior-bump short circuit, the staleness gate, and the fail-before-
//! mutation properties of `run`. Everything that would touch npm or a real
//! remote goes through `--dry-run`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Environment variables the binary reads; cleared so the developer's shell
/// (or a CI runner's real GITHUB_* variables) cannot leak into assertions.
const RECOGNIZED_VARS: &[&str] = &[
    "GITHUB_WORKSPACE",
    "PACKAGEJSON_DIR",
    "INPUT_COMMIT-TIME-CHECK",
    "INPUT_TAG-PREFIX",
    "GITHUB_USER",
    "GITHUB_EMAIL",
    "GITHUB_REPOSITORY",
    "GITHUB_ACTOR",
    "GITHUB_REF",
    "GITHUB_EVENT_PATH",
    "GITHUB_TOKEN",
];

/// Returns a Command configured to run our binary with a clean environment.
#[allow(deprecated)]
fn cmd() -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    for var in RECOGNIZED_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Write an event payload with the given commit messages, returning its path.
fn event_payload(dir: &Path, messages: &[&str]) -> String {
    let commits: Vec<serde_json::Value> = messages
        .iter()
        .map(|m| serde_json::json!({"message": m}))
        .collect();
    let payload = serde_json::json!({"commits": commits});
    let path = dir.join("event.json");
    fs::write(&path, payload.to_string()).unwrap();
    path.to_str().unwrap().to_string()
}

/// Write a minimal package.json at `version` into `dir`.
fn manifest(dir: &Path, version: &str) {
    fs::write(
        dir.join("package.json"),
        format!(r#"{{"name": "widgets", "version": "{version}"}}"#),
    )
    .unwrap();
}

// =============================================================================
// Classify Command
// =============================================================================

#[test]
fn classify_feat_is_minor() {
    let tmp = TempDir::new().unwrap();
    let payload = event_payload(tmp.path(), &["feat: add widget"]);

    cmd()
        .args(["classify", "--event", &payload])
        .assert()
        .success()
        .stdout(predicate::str::contains("minor"));
}

#[test]
fn classify_fix_is_patch() {
    let tmp = TempDir::new().unwrap();
    let payload = event_payload(tmp.path(), &["fix: correct typo"]);

    cmd()
        .args(["classify", "--event", &payload])
        .assert()
        .success()
        .stdout(predicate::str::contains("patch"));
}

#[test]
fn classify_breaking_change_is_major() {
    let tmp = TempDir::new().unwrap();
    let payload = event_payload(tmp.path(), &["refactor: x", "BREAKING CHANGE: y"]);

    cmd()
        .args(["classify", "--event", &payload])
        .assert()
        .success()
        .stdout(predicate::str::contains("major"));
}

#[test]
fn classify_bump_marker_reports_no_action() {
    let tmp = TempDir::new().unwrap();
    let payload = event_payload(tmp.path(), &["ci: version bump to 1.2.3"]);

    cmd()
        .args(["classify", "--event", &payload])
        .assert()
        .success()
        .stdout(predicate::str::contains("no action necessary"));
}

#[test]
fn classify_reads_event_path_from_environment() {
    let tmp = TempDir::new().unwrap();
    let payload = event_payload(tmp.path(), &["feat: add widget"]);

    cmd()
        .arg("classify")
        .env("GITHUB_EVENT_PATH", &payload)
        .assert()
        .success()
        .stdout(predicate::str::contains("minor"));
}

#[test]
fn classify_json_reports_level() {
    let tmp = TempDir::new().unwrap();
    let payload = event_payload(tmp.path(), &["fix: correct typo"]);

    let output = cmd()
        .args(["classify", "--json", "--event", &payload])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["level"], "patch");
    assert_eq!(json["prior_bump"], false);
    assert_eq!(json["commits"], 1);
}

#[test]
fn classify_json_reports_prior_bump() {
    let tmp = TempDir::new().unwrap();
    let payload = event_payload(tmp.path(), &["ci: Version Bump To v9.9.9"]);

    let output = cmd()
        .args(["classify", "--json", "--event", &payload])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["prior_bump"], true);
    assert!(json["level"].is_null());
}

#[test]
fn classify_without_event_path_names_the_variable() {
    cmd()
        .arg("classify")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_EVENT_PATH"));
}

// =============================================================================
// Run Command — skip paths
// =============================================================================

#[test]
fn run_with_prior_bump_commit_takes_no_action() {
    let tmp = TempDir::new().unwrap();
    let payload = event_payload(tmp.path(), &["ci: version bump to 1.2.3"]);

    // No manifest, no git, no credentials: the short circuit must fire
    // before any of them are needed.
    cmd()
        .arg("run")
        .env("GITHUB_EVENT_PATH", &payload)
        .assert()
        .success()
        .stdout(predicate::str::contains("No action necessary!"));
}

#[test]
fn run_prior_bump_marker_matches_any_case() {
    let tmp = TempDir::new().unwrap();
    let payload = event_payload(tmp.path(), &["docs: x", "ci: VERSION BUMP TO v2.0.0"]);

    cmd()
        .arg("run")
        .env("GITHUB_EVENT_PATH", &payload)
        .assert()
        .success()
        .stdout(predicate::str::contains("No action necessary!"));
}

// =============================================================================
// Run Command — dry-run planning
// =============================================================================

#[test]
fn dry_run_reports_the_planned_bump() {
    let tmp = TempDir::new().unwrap();
    manifest(tmp.path(), "1.2.3");
    let payload = event_payload(tmp.path(), &["feat: add widget"]);

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "run", "--dry-run"])
        .env("GITHUB_EVENT_PATH", &payload)
        .env("GITHUB_REF", "refs/heads/main")
        .assert()
        .success()
        .stdout(predicate::str::contains("would bump 1.2.3 (minor) on main"))
        .stdout(predicate::str::contains("Dry run"));
}

#[test]
fn dry_run_resolves_release_branches() {
    let tmp = TempDir::new().unwrap();
    manifest(tmp.path(), "0.4.0");
    let payload = event_payload(tmp.path(), &["fix: correct typo"]);

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "run", "--dry-run"])
        .env("GITHUB_EVENT_PATH", &payload)
        .env("GITHUB_REF", "refs/heads/release-1.0")
        .assert()
        .success()
        .stdout(predicate::str::contains("release-1.0"));
}

#[test]
fn dry_run_json_reports_the_outcome() {
    let tmp = TempDir::new().unwrap();
    manifest(tmp.path(), "1.2.3");
    let payload = event_payload(tmp.path(), &["feat: add widget"]);

    let output = cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "run",
            "--dry-run",
            "--json",
        ])
        .env("GITHUB_EVENT_PATH", &payload)
        .env("GITHUB_REF", "refs/heads/main")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["status"], "dry_run");
    assert_eq!(json["level"], "minor");
    assert_eq!(json["branch"], "main");
    assert_eq!(json["dry_run"], true);
}

// =============================================================================
// Run Command — failure before mutation
// =============================================================================

#[test]
fn malformed_ref_fails_before_any_mutation() {
    let tmp = TempDir::new().unwrap();
    manifest(tmp.path(), "1.2.3");
    let payload = event_payload(tmp.path(), &["feat: add widget"]);

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "run", "--dry-run"])
        .env("GITHUB_EVENT_PATH", &payload)
        .env("GITHUB_REF", "main")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot resolve branch"));
}

#[test]
fn missing_ref_names_the_variable() {
    let tmp = TempDir::new().unwrap();
    manifest(tmp.path(), "1.2.3");
    let payload = event_payload(tmp.path(), &["feat: add widget"]);

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "run", "--dry-run"])
        .env("GITHUB_EVENT_PATH", &payload)
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_REF"));
}

#[test]
fn missing_event_path_names_the_variable() {
    cmd()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_EVENT_PATH"));
}

#[test]
fn missing_manifest_fails_the_run() {
    let tmp = TempDir::new().unwrap();
    let payload = event_payload(tmp.path(), &["feat: add widget"]);

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "run", "--dry-run"])
        .env("GITHUB_EVENT_PATH", &payload)
        .env("GITHUB_REF", "refs/heads/main")
        .assert()
        .failure()
        .stderr(predicate::str::contains("package.json"));
}

// =============================================================================
// Staleness Gate (needs a real git repository)
// =============================================================================

fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}

/// Run a git command in `dir`, panicking on failure.
fn git(dir: &Path, args: &[&str], envs: &[(&str, &str)]) {
    let mut command = std::process::Command::new("git");
    command.args(args).current_dir(dir);
    for (key, value) in envs {
        command.env(key, value);
    }
    let output = command.output().unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Initialize a repository in `dir` with one commit at the given date.
fn repo_with_commit_at(dir: &Path, iso_date: &str) {
    git(dir, &["init", "--initial-branch=main"], &[]);
    git(dir, &["config", "user.name", "tester"], &[]);
    git(dir, &["config", "user.email", "tester@example.com"], &[]);
    fs::write(dir.join("README.md"), "widgets\n").unwrap();
    git(dir, &["add", "."], &[]);
    git(
        dir,
        &["commit", "-m", "chore: initial"],
        &[
            ("GIT_AUTHOR_DATE", iso_date),
            ("GIT_COMMITTER_DATE", iso_date),
        ],
    );
}

#[test]
fn stale_repository_skips_the_run() {
    if !git_available() {
        return;
    }
    let tmp = TempDir::new().unwrap();
    repo_with_commit_at(tmp.path(), "2020-01-01T00:00:00Z");
    let payload = event_payload(tmp.path(), &["feat: add widget"]);

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "run"])
        .env("INPUT_COMMIT-TIME-CHECK", "1")
        .env("GITHUB_EVENT_PATH", &payload)
        .assert()
        .success()
        .stdout(predicate::str::contains("no action necessary!"));
}

#[test]
fn fresh_repository_passes_the_gate() {
    if !git_available() {
        return;
    }
    let tmp = TempDir::new().unwrap();
    repo_with_commit_at(tmp.path(), &raw_git_date_now());
    manifest(tmp.path(), "1.2.3");
    let payload = event_payload(tmp.path(), &["feat: add widget"]);

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "run", "--dry-run"])
        .env("INPUT_COMMIT-TIME-CHECK", "24")
        .env("GITHUB_EVENT_PATH", &payload)
        .env("GITHUB_REF", "refs/heads/main")
        .assert()
        .success()
        .stdout(predicate::str::contains("would bump 1.2.3 (minor) on main"));
}

#[test]
fn unset_threshold_never_consults_git() {
    // No repository in the temp dir at all: with the gate disabled the run
    // must still plan successfully.
    let tmp = TempDir::new().unwrap();
    manifest(tmp.path(), "1.2.3");
    let payload = event_payload(tmp.path(), &["fix: correct typo"]);

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "run", "--dry-run"])
        .env("GITHUB_EVENT_PATH", &payload)
        .env("GITHUB_REF", "refs/heads/main")
        .assert()
        .success()
        .stdout(predicate::str::contains("would bump 1.2.3 (patch) on main"));
}

#[test]
fn malformed_threshold_disables_the_gate() {
    let tmp = TempDir::new().unwrap();
    manifest(tmp.path(), "1.2.3");
    let payload = event_payload(tmp.path(), &["fix: correct typo"]);

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "run", "--dry-run"])
        .env("INPUT_COMMIT-TIME-CHECK", "soon")
        .env("GITHUB_EVENT_PATH", &payload)
        .env("GITHUB_REF", "refs/heads/main")
        .assert()
        .success()
        .stdout(predicate::str::contains("would bump"));
}

/// Current time in git's raw date format (`@<epoch-seconds> <offset>`).
fn raw_git_date_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    format!("@{secs} +0000")
}
