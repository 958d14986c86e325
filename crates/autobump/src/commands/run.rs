//! Run command — thin CLI layer over `autobump_core::run`.

use anyhow::Context;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use autobump_core::config::Config;
use autobump_core::run::{self, PhaseOutcome, RunEvent, RunOptions, RunStatus};

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Run without making changes (show what would happen)
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the run command.
#[instrument(name = "cmd_run", skip_all, fields(json_output))]
pub fn cmd_run(
    args: RunArgs,
    global_json: bool,
    config: &Config,
    cwd: &camino::Utf8Path,
) -> anyhow::Result<()> {
    debug!(
        json_output = global_json,
        dry_run = args.dry_run,
        "executing run command"
    );

    let options = RunOptions {
        dry_run: args.dry_run,
    };

    let on_event = |event: RunEvent| {
        if global_json {
            return;
        }
        match event {
            RunEvent::PhaseStarted(_) => {}
            RunEvent::PhaseCompleted(phase, PhaseOutcome::Success { message }) => {
                println!("  {} {}: {message}", "✓".green(), phase.bold());
            }
            RunEvent::PhaseCompleted(phase, PhaseOutcome::Skipped { reason }) => {
                println!("  {} {}: {reason}", "○".yellow(), phase.bold());
            }
        }
    };

    let outcome = run::execute(config, cwd, options, on_event).context("version bump failed")?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!();
    match outcome.status {
        RunStatus::Completed => {
            println!(
                "{} {}",
                "Version bumped!".green().bold(),
                outcome.tag.as_deref().unwrap_or_default().cyan()
            );
        }
        RunStatus::SkippedStale => {
            println!(
                "{}",
                "Repository has been quiet past the threshold — no action necessary!".yellow()
            );
        }
        RunStatus::SkippedPriorBump => {
            println!("{}", "No action necessary!".yellow());
        }
        RunStatus::DryRun => {
            println!("{}", "Dry run — no changes made.".yellow());
        }
    }

    Ok(())
}
