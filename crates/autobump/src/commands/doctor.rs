//! Doctor command — diagnose the CI environment.

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `doctor` subcommand.
#[derive(Args, Debug, Default)]
pub struct DoctorArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct DoctorReport {
    tools: Vec<ToolStatus>,
    environment: EnvironmentInfo,
}

#[derive(Serialize)]
struct ToolStatus {
    /// Binary the pipeline shells out to.
    name: &'static str,
    /// Resolved path, if found on PATH.
    path: Option<String>,
}

#[derive(Serialize)]
struct EnvironmentInfo {
    /// Current working directory
    cwd: Option<String>,
    /// Recognized environment variables
    env_vars: Vec<EnvVar>,
}

#[derive(Serialize)]
struct EnvVar {
    name: &'static str,
    value: Option<String>,
    description: &'static str,
}

/// Binaries every full run needs on PATH.
const REQUIRED_TOOLS: &[&str] = &["git", "npm"];

impl DoctorReport {
    fn gather(cwd: &camino::Utf8Path) -> Self {
        let tools = REQUIRED_TOOLS
            .iter()
            .map(|&name| ToolStatus {
                name,
                path: which::which(name).ok().map(|p| p.display().to_string()),
            })
            .collect();

        Self {
            tools,
            environment: EnvironmentInfo {
                cwd: Some(cwd.to_string()),
                env_vars: vec![
                    env_var("GITHUB_EVENT_PATH", "Push-event payload path"),
                    env_var("GITHUB_REF", "Triggering ref"),
                    env_var("GITHUB_REPOSITORY", "Repository slug"),
                    env_var("GITHUB_ACTOR", "Push actor"),
                    secret_env_var("GITHUB_TOKEN", "Push auth token"),
                    env_var("GITHUB_USER", "Git identity name"),
                    env_var("GITHUB_EMAIL", "Git identity email"),
                    env_var("GITHUB_WORKSPACE", "Checkout root"),
                    env_var("PACKAGEJSON_DIR", "Manifest subdirectory"),
                    env_var("INPUT_COMMIT-TIME-CHECK", "Staleness threshold (hours)"),
                    env_var("INPUT_TAG-PREFIX", "Tag prefix"),
                    env_var("RUST_LOG", "Log filter directive"),
                ],
            },
        }
    }
}

fn env_var(name: &'static str, description: &'static str) -> EnvVar {
    EnvVar {
        name,
        value: std::env::var(name).ok(),
        description,
    }
}

/// Like [`env_var`], but only reports presence — the value stays out of
/// every report format.
fn secret_env_var(name: &'static str, description: &'static str) -> EnvVar {
    EnvVar {
        name,
        value: std::env::var_os(name).map(|_| "(set)".to_string()),
        description,
    }
}

/// Run diagnostics and report tool and environment status.
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `cwd` - Current working directory
#[instrument(name = "cmd_doctor", skip_all, fields(json_output))]
pub fn cmd_doctor(
    _args: DoctorArgs,
    global_json: bool,
    cwd: &camino::Utf8Path,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing doctor command");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("valid template"),
    );
    spinner.set_message("Gathering diagnostics...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let report = DoctorReport::gather(cwd);
    spinner.finish_and_clear();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", "Tools".bold().underline());
        for tool in &report.tools {
            match &tool.path {
                Some(path) => println!("  {} {}: {}", "✓".green(), tool.name, path.cyan()),
                None => println!("  {} {}: {}", "✗".red(), tool.name, "not found on PATH".yellow()),
            }
        }
        println!();

        println!("{}", "Environment".bold().underline());
        println!("  {}: {}", "Working directory".dimmed(), cwd.cyan());

        let set_vars: Vec<_> = report
            .environment
            .env_vars
            .iter()
            .filter(|v| v.value.is_some())
            .collect();

        if set_vars.is_empty() {
            println!("  {} No recognized variables set", "○".dimmed());
        } else {
            for var in set_vars {
                println!(
                    "  {}: {}",
                    var.name.dimmed(),
                    var.value.as_deref().unwrap_or("").cyan()
                );
            }
        }
    }

    Ok(())
}
