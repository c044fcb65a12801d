use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cr_cli::commands::report;
use cr_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Report(args)) => {
            let config = load_config(&cli)?;
            report::run(args, &config, cli.verbose)?;
        }
        Some(Commands::Config) => {
            let config = load_config(&cli)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}

/// Loads and validates configuration before any events are read.
fn load_config(cli: &Cli) -> Result<Config> {
    let config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    config.validate()?;
    Ok(config)
}
