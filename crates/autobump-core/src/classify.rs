//! Bump classification from commit messages.
//!
//! The whole message set of the push decides a single bump level; presence
//! anywhere in the set is what matters, never counts or per-commit order.
//! Major outranks minor, minor outranks patch.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Marker phrase written into every bump commit message.
///
/// A push whose messages already contain this phrase (any case) is a
/// retrigger of our own commit and is skipped, which is what breaks the
/// bump → push → CI → bump loop. The match is a plain substring test, so an
/// unrelated message quoting the phrase is also treated as a prior bump.
pub const BUMP_MARKER: &str = "version bump to";

/// Semver bump level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BumpLevel {
    /// Patch release (x.y.Z).
    Patch,
    /// Minor release (x.Y.0).
    Minor,
    /// Major release (X.0.0).
    Major,
}

impl BumpLevel {
    /// The level as the argument `npm version` expects.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

impl std::fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the message set asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The push contains one of our own bump commits; do nothing.
    PriorBump,
    /// Apply a bump at this level.
    Bump(BumpLevel),
}

/// Classify the required bump from the push's commit messages.
///
/// Rules, in order:
/// 1. any message containing [`BUMP_MARKER`] (case-insensitive) → [`Classification::PriorBump`]
/// 2. any message containing `BREAKING CHANGE` or `major` (case-sensitive) → major
/// 3. any message starting with `feat` or containing `minor` (case-insensitive) → minor
/// 4. otherwise → patch
#[instrument(skip(messages), fields(count = messages.len()))]
pub fn classify(messages: &[String]) -> Classification {
    if messages
        .iter()
        .any(|message| message.to_lowercase().contains(BUMP_MARKER))
    {
        debug!("bump marker found in push, prior bump detected");
        return Classification::PriorBump;
    }

    let level = if messages
        .iter()
        .any(|message| message.contains("BREAKING CHANGE") || message.contains("major"))
    {
        BumpLevel::Major
    } else if messages.iter().any(|message| {
        let lower = message.to_lowercase();
        lower.starts_with("feat") || lower.contains("minor")
    }) {
        BumpLevel::Minor
    } else {
        BumpLevel::Patch
    };

    debug!(%level, "classified bump level");
    Classification::Bump(level)
}
