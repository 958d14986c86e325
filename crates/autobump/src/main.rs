//! autobump CLI
#![deny(unsafe_code)]

use anyhow::Context;
use autobump::{Cli, Commands, commands};
use autobump_core::Config;
use clap::Parser;
use tracing::debug;

mod observability;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();

    let env_filter = observability::env_filter(cli.quiet, cli.verbose, "info");
    observability::init(env_filter);

    let config = Config::load().context("failed to resolve configuration")?;

    // An explicit -C wins; otherwise honor the workspace/suffix from the
    // environment. Both git and npm operate on the process cwd from here on.
    if let Some(ref dir) = cli.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    } else if let Some(root) = config.package_root() {
        std::env::set_current_dir(&root)
            .with_context(|| format!("failed to change directory to {root}"))?;
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let cwd = camino::Utf8PathBuf::try_from(cwd).map_err(|e| {
        anyhow::anyhow!(
            "current directory is not valid UTF-8: {}",
            e.into_path_buf().display()
        )
    })?;

    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        json = cli.json,
        color = ?cli.color,
        chdir = ?cli.chdir,
        "CLI initialized"
    );

    // Execute command
    let result = match cli.command {
        Commands::Run(args) => commands::run::cmd_run(args, cli.json, &config, &cwd),
        Commands::Classify(args) => commands::classify::cmd_classify(args, cli.json, &config),
        Commands::Doctor(args) => commands::doctor::cmd_doctor(args, cli.json, &cwd),
    };
    if let Err(ref err) = result {
        tracing::error!(error = %err, "fatal error");
    }
    result
}
