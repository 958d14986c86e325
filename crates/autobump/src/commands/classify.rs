//! Classify command — preview the bump decision without mutating anything.

use anyhow::Context;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use autobump_core::classify::{self, Classification};
use autobump_core::config::Config;
use autobump_core::event::PushEvent;

/// Arguments for the `classify` subcommand.
#[derive(Args, Debug, Default)]
pub struct ClassifyArgs {
    /// Event payload path (overrides GITHUB_EVENT_PATH)
    #[arg(long, value_name = "FILE")]
    pub event: Option<camino::Utf8PathBuf>,
}

/// Execute the classify command.
#[instrument(name = "cmd_classify", skip_all, fields(json_output))]
pub fn cmd_classify(args: ClassifyArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing classify command");

    let path = match args.event {
        Some(path) => path,
        None => config
            .event_path()
            .context("no event payload to classify")?
            .to_path_buf(),
    };

    let event = PushEvent::from_path(&path).context("failed to read event payload")?;
    let messages = event.messages();
    let classification = classify::classify(&messages);

    if global_json {
        let report = match classification {
            Classification::PriorBump => serde_json::json!({
                "commits": messages.len(),
                "prior_bump": true,
                "level": null,
            }),
            Classification::Bump(level) => serde_json::json!({
                "commits": messages.len(),
                "prior_bump": false,
                "level": level,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}: {}", "Commits".dimmed(), messages.len());
    match classification {
        Classification::PriorBump => {
            println!(
                "{}",
                "Push already contains a bump commit — no action necessary!".yellow()
            );
        }
        Classification::Bump(level) => {
            println!(
                "{}: {}",
                "Bump level".bold(),
                level.to_string().green().bold()
            );
        }
    }

    Ok(())
}
