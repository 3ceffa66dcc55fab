// ABOUTME: Entry point for the azdeploy CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use azdeploy::config::{self, CONFIG_FILENAME, Config};
use azdeploy::error::Result;
use azdeploy::output::{Event, Output};
use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = cli.output_mode();
    if let Err(e) = run(cli, Output::new(mode)).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;
    let load = || load_config(cli.config.as_deref(), &cwd);

    match cli.command {
        Commands::Init { force } => {
            config::init_config(&cwd, force)?;
            output.emit(&Event::ConfigWritten {
                path: CONFIG_FILENAME.to_string(),
            });
            Ok(())
        }
        Commands::Deploy {
            kind,
            source,
            name,
            env,
            ephemeral,
        } => {
            let args = commands::DeployArgs {
                kind: kind.into(),
                source,
                name,
                env,
                ephemeral,
            };
            commands::deploy(&load()?, args, output).await
        }
        Commands::Teardown { name } => commands::teardown(&load()?, &name, output).await,
        Commands::Group { command } => commands::group(&load()?, command, output).await,
    }
}

fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    match explicit {
        Some(path) => Config::load(path),
        None => Config::discover_or_env(cwd),
    }
}
