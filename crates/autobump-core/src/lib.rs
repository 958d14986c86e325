//! Core library for autobump.
//!
//! This crate provides the foundational types and functionality used by the
//! `autobump` CLI and any downstream consumers.
//!
//! # Modules
//!
//! - [`classify`] - Bump classification from commit messages
//! - [`config`] - Configuration resolution from the CI environment
//! - [`error`] - Error types and result aliases
//! - [`event`] - Push-event payload parsing
//! - [`gate`] - Staleness gate
//! - [`git`] - Git operations for the bump workflow
//! - [`npm`] - npm operations for the bump workflow
//! - [`run`] - Run orchestrator
//!
//! # Quick Start
//!
//! ```no_run
//! use autobump_core::{Config, classify};
//!
//! let config = Config::load().expect("environment resolves");
//! println!("tag prefix: {:?}", config.tag_prefix());
//!
//! let messages = vec!["feat: add widget".to_string()];
//! println!("{:?}", classify::classify(&messages));
//! ```
#![deny(unsafe_code)]

pub mod classify;

pub mod config;

pub mod error;

pub mod event;

pub mod gate;

pub mod git;

pub mod npm;

pub mod run;

pub use classify::{BumpLevel, Classification};

pub use config::Config;

pub use error::{ConfigError, ConfigResult};

// Re-export semver so downstream crates don't need a direct dependency.
pub use semver;
