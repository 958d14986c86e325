//! Configuration resolution from the CI environment.
//!
//! Every option autobump understands arrives as an environment variable set
//! by the CI platform or by the workflow that invokes it. There are no
//! configuration files — a run is fully described by its environment:
//!
//! - `GITHUB_WORKSPACE` — checkout root the job runs in
//! - `PACKAGEJSON_DIR` — optional subdirectory holding `package.json`
//! - `INPUT_COMMIT-TIME-CHECK` — staleness threshold in hours (unset/zero disables)
//! - `INPUT_TAG-PREFIX` — prefix for the created tag (default: none)
//! - `GITHUB_USER` / `GITHUB_EMAIL` — git identity for the bump commits
//! - `GITHUB_REPOSITORY` / `GITHUB_ACTOR` / `GITHUB_TOKEN` — push credentials
//! - `GITHUB_REF` — the ref that triggered the run
//! - `GITHUB_EVENT_PATH` — path to the push-event payload
//!
//! # Example
//! ```no_run
//! use autobump_core::config::Config;
//!
//! let config = Config::load().expect("environment resolves");
//! println!("tag prefix: {:?}", config.tag_prefix());
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::value::{Dict, Map};
use figment::{Figment, Metadata, Profile, Provider};
use secrecy::SecretString;
use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};

/// Identity used for bump commits when `GITHUB_USER` is unset.
const DEFAULT_GIT_USER: &str = "Automated Version Bump";

/// Identity used for bump commits when `GITHUB_EMAIL` is unset.
const DEFAULT_GIT_EMAIL: &str = "autobump@users.noreply.github.com";

/// Environment variables the resolver recognizes, paired with the [`Config`]
/// field each one feeds. Everything else in the process environment is
/// ignored.
const RECOGNIZED_VARS: &[(&str, &str)] = &[
    ("GITHUB_WORKSPACE", "workspace"),
    ("PACKAGEJSON_DIR", "packagejson_dir"),
    ("INPUT_COMMIT-TIME-CHECK", "commit_time_check"),
    ("INPUT_TAG-PREFIX", "tag_prefix"),
    ("GITHUB_USER", "user"),
    ("GITHUB_EMAIL", "email"),
    ("GITHUB_REPOSITORY", "repository"),
    ("GITHUB_ACTOR", "actor"),
    ("GITHUB_REF", "git_ref"),
    ("GITHUB_EVENT_PATH", "event_path"),
    ("GITHUB_TOKEN", "token"),
];

/// The resolved run configuration.
///
/// Immutable for the process lifetime. Optional settings fall back at the
/// accessor level; settings a later stage cannot run without are checked for
/// presence there, not at load time, so a `classify`-only invocation does not
/// demand push credentials.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Checkout root (`GITHUB_WORKSPACE`).
    workspace: Option<Utf8PathBuf>,
    /// Manifest subdirectory (`PACKAGEJSON_DIR`).
    packagejson_dir: Option<Utf8PathBuf>,
    /// Staleness threshold in hours (`INPUT_COMMIT-TIME-CHECK`), kept as the
    /// raw string so malformed values disable the gate instead of erroring.
    commit_time_check: Option<String>,
    /// Tag prefix (`INPUT_TAG-PREFIX`).
    tag_prefix: Option<String>,
    /// Git identity name (`GITHUB_USER`).
    user: Option<String>,
    /// Git identity email (`GITHUB_EMAIL`).
    email: Option<String>,
    /// Repository slug, `owner/name` (`GITHUB_REPOSITORY`).
    repository: Option<String>,
    /// Triggering actor (`GITHUB_ACTOR`).
    actor: Option<String>,
    /// Triggering ref (`GITHUB_REF`).
    git_ref: Option<String>,
    /// Push-event payload path (`GITHUB_EVENT_PATH`).
    event_path: Option<Utf8PathBuf>,
    /// Auth token (`GITHUB_TOKEN`). Redacted in `Debug` output.
    token: Option<SecretString>,
}

impl Config {
    /// Resolve configuration from the process environment.
    #[tracing::instrument]
    pub fn load() -> ConfigResult<Self> {
        let config = Self::from_provider(CiEnv::from_env())?;
        tracing::debug!(?config, "configuration resolved from environment");
        Ok(config)
    }

    /// Extract a configuration from any figment provider.
    fn from_provider(provider: impl Provider) -> ConfigResult<Self> {
        Figment::from(provider)
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))
    }

    /// Git identity name, with the fixed fallback.
    pub fn git_user(&self) -> &str {
        self.user.as_deref().unwrap_or(DEFAULT_GIT_USER)
    }

    /// Git identity email, with the fixed fallback.
    pub fn git_email(&self) -> &str {
        self.email.as_deref().unwrap_or(DEFAULT_GIT_EMAIL)
    }

    /// Prefix applied to the tag created on the target branch.
    pub fn tag_prefix(&self) -> &str {
        self.tag_prefix.as_deref().unwrap_or("")
    }

    /// Staleness threshold in hours, if the gate is enabled.
    ///
    /// Absent, malformed, zero, and negative values all return `None`
    /// (gate disabled) — the threshold is best-effort input, never an error.
    pub fn commit_time_check_hours(&self) -> Option<f64> {
        self.commit_time_check
            .as_deref()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|hours| *hours > 0.0)
    }

    /// Repository slug (`owner/name`), required for pushing.
    pub fn repository(&self) -> ConfigResult<&str> {
        self.repository
            .as_deref()
            .ok_or(ConfigError::MissingVar("GITHUB_REPOSITORY"))
    }

    /// Actor embedded in the push URL, required for pushing.
    pub fn actor(&self) -> ConfigResult<&str> {
        self.actor
            .as_deref()
            .ok_or(ConfigError::MissingVar("GITHUB_ACTOR"))
    }

    /// The ref that triggered the run, required to resolve the target branch.
    pub fn git_ref(&self) -> ConfigResult<&str> {
        self.git_ref
            .as_deref()
            .ok_or(ConfigError::MissingVar("GITHUB_REF"))
    }

    /// Path to the push-event payload, required to read commit messages.
    pub fn event_path(&self) -> ConfigResult<&Utf8Path> {
        self.event_path
            .as_deref()
            .ok_or(ConfigError::MissingVar("GITHUB_EVENT_PATH"))
    }

    /// Auth token embedded in the push URL, required for pushing.
    pub fn token(&self) -> ConfigResult<&SecretString> {
        self.token
            .as_ref()
            .ok_or(ConfigError::MissingVar("GITHUB_TOKEN"))
    }

    /// Directory holding `package.json`, when a working-dir suffix is set.
    ///
    /// Returns `None` when `PACKAGEJSON_DIR` is unset — the process then
    /// stays wherever the CI job started it.
    pub fn package_root(&self) -> Option<Utf8PathBuf> {
        let suffix = self.packagejson_dir.as_ref()?;
        Some(match &self.workspace {
            Some(workspace) => workspace.join(suffix),
            None => suffix.clone(),
        })
    }
}

/// Figment provider surfacing the recognized CI variables.
///
/// Values are kept verbatim as strings — the lenient numeric handling for
/// the threshold lives in the accessor, not in extraction, so a value like
/// `soon` never fails the load.
struct CiEnv {
    vars: Vec<(&'static str, String)>,
}

impl CiEnv {
    /// Snapshot the recognized variables from the process environment.
    fn from_env() -> Self {
        let vars = RECOGNIZED_VARS
            .iter()
            .filter_map(|(name, field)| std::env::var(name).ok().map(|value| (*field, value)))
            .collect();
        Self { vars }
    }
}

impl Provider for CiEnv {
    fn metadata(&self) -> Metadata {
        Metadata::named("CI environment")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let mut dict = Dict::new();
        for (field, value) in &self.vars {
            dict.insert((*field).to_string(), value.clone().into());
        }
        Ok(Profile::Default.collect(dict))
    }
}
