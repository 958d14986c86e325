//! npm operations for the bump workflow.
//!
//! The manifest version is owned by npm: this module only asks `npm version`
//! to read and rewrite it, and reads `package.json` directly for the single
//! initial lookup. Commands run against the current working directory, like
//! the git wrappers.

use std::process::Command;

use camino::Utf8Path;
use semver::Version;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::classify::BumpLevel;

/// Errors from npm operations.
#[derive(Error, Debug)]
pub enum NpmError {
    /// Failed to execute the `npm` command.
    #[error("failed to run npm: {0}")]
    Exec(#[from] std::io::Error),

    /// `npm` returned a non-zero exit code.
    #[error("npm {command} failed: {stderr}")]
    Command {
        /// The npm subcommand that failed.
        command: String,
        /// Captured stderr.
        stderr: String,
    },

    /// Failed to read `package.json`.
    #[error("failed to read {path}: {source}")]
    Manifest {
        /// The manifest path that could not be read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// `package.json` is not valid JSON.
    #[error("invalid package.json: {0}")]
    ManifestParse(#[from] serde_json::Error),

    /// `package.json` has no `version` field.
    #[error("package.json has no version field")]
    MissingVersion,

    /// The manifest version is not valid semver.
    #[error("invalid manifest version: {0}")]
    InvalidVersion(#[from] semver::Error),
}

/// Result alias for npm operations.
pub type NpmResult<T> = Result<T, NpmError>;

/// Read the `version` field of `package.json` under `root`.
#[instrument]
pub fn read_package_version(root: &Utf8Path) -> NpmResult<Version> {
    let path = root.join("package.json");
    let raw = std::fs::read_to_string(&path).map_err(|source| NpmError::Manifest {
        path: path.to_string(),
        source,
    })?;
    let manifest: serde_json::Value = serde_json::from_str(&raw)?;
    let version = manifest
        .get("version")
        .and_then(|v| v.as_str())
        .ok_or(NpmError::MissingVersion)?;
    let version = Version::parse(version)?;
    debug!(%version, "manifest version");
    Ok(version)
}

/// Re-apply `current` to the manifest without tagging.
///
/// `--allow-same-version` makes this an idempotent no-op write; it pins the
/// manifest to the value we read before the bump is computed.
#[instrument]
pub fn version_write(current: &str) -> NpmResult<()> {
    npm(&[
        "version",
        "--allow-same-version=true",
        "--git-tag-version=false",
        current,
    ])?;
    Ok(())
}

/// Apply a bump at `level` and return the version npm reports.
///
/// The returned string carries npm's `v` prefix (e.g. `v1.2.4`).
#[instrument]
pub fn version_bump(level: BumpLevel) -> NpmResult<String> {
    let output = npm(&["version", "--git-tag-version=false", level.as_str()])?;
    let version = output.trim().to_string();
    debug!(%version, "npm reported new version");
    Ok(version)
}

/// Run an npm command and return its stdout.
fn npm(args: &[&str]) -> NpmResult<String> {
    let output = Command::new("npm").args(args).output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(NpmError::Command {
            command: args.first().unwrap_or(&"").to_string(),
            stderr,
        })
    }
}
