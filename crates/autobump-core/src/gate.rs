//! Staleness gate — skip bumping repositories that have gone quiet.
//!
//! With a positive threshold configured, the last commit's age decides
//! whether the run proceeds. An old last commit means the push is CI noise
//! on a dormant repository and the run ends successfully with no mutation.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::git;

/// Errors from the staleness check.
#[derive(Error, Debug)]
pub enum GateError {
    /// Could not read the last commit timestamp.
    #[error(transparent)]
    Git(#[from] git::GitError),

    /// The timestamp git printed is not strict ISO-8601.
    #[error("unparseable commit timestamp {timestamp:?}: {source}")]
    Timestamp {
        /// What git printed.
        timestamp: String,
        /// The parse failure.
        source: chrono::ParseError,
    },
}

/// Result alias for gate operations.
pub type GateResult<T> = Result<T, GateError>;

/// Outcome of the staleness check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision {
    /// No threshold configured; the gate never skips.
    Disabled,
    /// Recent activity; continue with the run.
    Proceed {
        /// Hours since the last commit.
        elapsed_hours: f64,
        /// Configured threshold in hours.
        threshold_hours: f64,
    },
    /// The repository has been quiet at least as long as the threshold.
    Skip {
        /// Hours since the last commit.
        elapsed_hours: f64,
        /// Configured threshold in hours.
        threshold_hours: f64,
    },
}

/// Check the repository's last commit age against the configured threshold.
///
/// `threshold_hours` of `None` disables the gate entirely.
#[instrument]
pub fn check(threshold_hours: Option<f64>) -> GateResult<GateDecision> {
    let Some(threshold_hours) = threshold_hours else {
        debug!("commit-time-check not set, gate disabled");
        return Ok(GateDecision::Disabled);
    };

    let timestamp = git::last_commit_timestamp()?;
    evaluate(&timestamp, Utc::now(), threshold_hours)
}

/// Compare a commit timestamp against `now` and the threshold.
///
/// The comparison happens in milliseconds: elapsed >= threshold skips.
pub fn evaluate(
    timestamp: &str,
    now: DateTime<Utc>,
    threshold_hours: f64,
) -> GateResult<GateDecision> {
    let last_commit = DateTime::parse_from_rfc3339(timestamp.trim()).map_err(|source| {
        GateError::Timestamp {
            timestamp: timestamp.trim().to_string(),
            source,
        }
    })?;

    let elapsed_ms = (now - last_commit.with_timezone(&Utc)).num_milliseconds() as f64;
    let threshold_ms = threshold_hours * 3_600_000.0;
    let elapsed_hours = elapsed_ms / 3_600_000.0;

    let decision = if elapsed_ms >= threshold_ms {
        GateDecision::Skip {
            elapsed_hours,
            threshold_hours,
        }
    } else {
        GateDecision::Proceed {
            elapsed_hours,
            threshold_hours,
        }
    };
    debug!(elapsed_hours, threshold_hours, ?decision, "staleness gate");
    Ok(decision)
}
