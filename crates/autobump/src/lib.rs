//! Library interface for the `autobump` CLI.
//!
//! This crate exposes the CLI's argument parser and command structure as a library,
//! primarily for documentation generation and testing. The actual entry point is
//! in `main.rs`.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`Commands`] - Available subcommands
//! - [`commands`] - Command implementations
//!
//! # Documentation Generation
//!
//! The [`command()`] function returns the clap `Command` for generating man pages
//! and shell completions via `xtask`.

pub mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Configure global color output based on this choice.
    ///
    /// Call this once at startup to set the color mode.
    pub fn apply(self) {
        match self {
            Self::Auto => {} // owo-colors auto-detects by default
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    GITHUB_EVENT_PATH        Push-event payload with the commit messages
    GITHUB_REF               Ref that triggered the run (refs/<type>/<name>)
    GITHUB_REPOSITORY        Repository slug (owner/name) to push to
    GITHUB_ACTOR             Actor embedded in the push URL
    GITHUB_TOKEN             Auth token embedded in the push URL
    GITHUB_USER              Git identity name for bump commits
    GITHUB_EMAIL             Git identity email for bump commits
    GITHUB_WORKSPACE         Checkout root the job runs in
    PACKAGEJSON_DIR          Subdirectory holding package.json
    INPUT_COMMIT-TIME-CHECK  Staleness threshold in hours
    INPUT_TAG-PREFIX         Prefix for the created tag
    RUST_LOG                 Log filter (e.g., debug, autobump=trace)
";
/// Command-line interface definition for autobump.
#[derive(Parser)]
#[command(name = "autobump")]
#[command(about = "Automated semantic version bumps for CI", long_about = None)]
#[command(version)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Run as if started in DIR (overrides PACKAGEJSON_DIR)
    #[arg(short = 'C', long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands for the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the full bump pipeline: gate, classify, apply, publish
    Run(commands::run::RunArgs),

    /// Classify the bump level from the push event without mutating anything
    Classify(commands::classify::ClassifyArgs),

    /// Diagnose the CI environment
    Doctor(commands::doctor::DoctorArgs),
}

/// Returns the clap command for documentation generation
pub fn command() -> clap::Command {
    Cli::command()
}
