//! Push-event payload parsing.
//!
//! The CI platform writes the triggering event as a JSON file and points
//! `GITHUB_EVENT_PATH` at it. The only part of that payload this tool cares
//! about is the ordered `commits` array; everything else is ignored.

use camino::Utf8Path;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from reading or parsing the event payload.
#[derive(Error, Debug)]
pub enum EventError {
    /// Failed to read the payload file.
    #[error("failed to read event payload {path}: {source}")]
    Read {
        /// The payload path that could not be read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The payload is not valid JSON.
    #[error("invalid event payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result alias for event operations.
pub type EventResult<T> = Result<T, EventError>;

/// One commit record from the push event.
///
/// Only the fields the classifier reads are modeled; unknown payload fields
/// are dropped during deserialization.
#[derive(Debug, Clone, Deserialize)]
struct CommitRecord {
    /// Commit subject (first line of the message).
    #[serde(default)]
    message: String,
    /// Commit body, absent for subject-only commits.
    #[serde(default)]
    body: Option<String>,
}

/// The push event that triggered this run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushEvent {
    /// Commits in the push, in payload order. A payload without a `commits`
    /// key (e.g. a tag push) yields an empty set.
    #[serde(default)]
    commits: Vec<CommitRecord>,
}

impl PushEvent {
    /// Read and parse the payload file at `path`.
    #[instrument]
    pub fn from_path(path: &Utf8Path) -> EventResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| EventError::Read {
            path: path.to_string(),
            source,
        })?;
        let event = Self::from_json(&raw)?;
        debug!(commits = event.commits.len(), "event payload parsed");
        Ok(event)
    }

    /// Parse a payload from a JSON string.
    pub fn from_json(raw: &str) -> EventResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// The full message of each commit, in push order.
    ///
    /// A commit with a body contributes `subject\nbody`; a commit without
    /// one contributes the subject alone.
    pub fn messages(&self) -> Vec<String> {
        self.commits
            .iter()
            .map(|commit| match &commit.body {
                Some(body) => format!("{}\n{}", commit.message, body),
                None => commit.message.clone(),
            })
            .collect()
    }
}
