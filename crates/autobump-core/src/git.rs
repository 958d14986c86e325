//! Git operations for the bump workflow.
//!
//! Shells out to `git` for all operations, one blocking invocation per step.
//! The process is expected to sit inside the CI checkout; every command runs
//! against the current working directory.

use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, instrument};

/// Matches the CI ref format `refs/<type>/<name>` and captures the name.
static REF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"refs/[a-zA-Z]+/(.*)").expect("valid ref pattern"));

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    /// Failed to execute the `git` command.
    #[error("failed to run git: {0}")]
    Exec(#[from] std::io::Error),

    /// `git` returned a non-zero exit code.
    #[error("git {command} failed: {stderr}")]
    Command {
        /// The git subcommand that failed (e.g., "push").
        command: String,
        /// Captured stderr.
        stderr: String,
    },

    /// The triggering ref does not look like `refs/<type>/<name>`.
    #[error("cannot resolve branch from ref {0:?}")]
    UnrecognizedRef(String),
}

/// Result alias for git operations.
pub type GitResult<T> = Result<T, GitError>;

/// Extract the branch name from a CI ref such as `refs/heads/release-1.0`.
///
/// Fails before any repository mutation when the ref has another shape.
pub fn branch_from_ref(git_ref: &str) -> GitResult<String> {
    let captures = REF_PATTERN
        .captures(git_ref)
        .ok_or_else(|| GitError::UnrecognizedRef(git_ref.to_string()))?;
    let branch = captures[1].to_string();
    debug!(%git_ref, %branch, "resolved target branch");
    Ok(branch)
}

/// Set the commit identity in the local repository configuration.
#[instrument]
pub fn config_identity(name: &str, email: &str) -> GitResult<()> {
    git(&["config", "user.name", name])?;
    git(&["config", "user.email", email])?;
    Ok(())
}

/// Timestamp of the most recent commit, in strict ISO-8601.
#[instrument]
pub fn last_commit_timestamp() -> GitResult<String> {
    let output = git(&["log", "-1", "--format=%cd", "--date=iso-strict"])?;
    let timestamp = output.trim().to_string();
    debug!(%timestamp, "last commit timestamp");
    Ok(timestamp)
}

/// Switch the working tree to the named branch.
#[instrument]
pub fn checkout(branch: &str) -> GitResult<()> {
    git(&["checkout", branch])?;
    Ok(())
}

/// Commit all tracked changes with the given message.
#[instrument]
pub fn commit_all(message: &str) -> GitResult<()> {
    git(&["commit", "-a", "-m", message])?;
    Ok(())
}

/// Create a lightweight tag at the current commit.
#[instrument]
pub fn tag(name: &str) -> GitResult<()> {
    git(&["tag", name])?;
    Ok(())
}

/// Push the current branch to `remote`, bringing reachable tags along.
#[instrument(skip(remote))]
pub fn push_follow_tags(remote: &str) -> GitResult<()> {
    git(&["push", remote, "--follow-tags"])?;
    Ok(())
}

/// Push all tags to `remote`.
#[instrument(skip(remote))]
pub fn push_tags(remote: &str) -> GitResult<()> {
    git(&["push", remote, "--tags"])?;
    Ok(())
}

/// Run a git command and return its stdout.
fn git(args: &[&str]) -> GitResult<String> {
    let output = Command::new("git").args(args).output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(GitError::Command {
            command: args.first().unwrap_or(&"").to_string(),
            stderr,
        })
    }
}
