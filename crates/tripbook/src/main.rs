//! `tripbook` - CLI for the trip planner
//!
//! Each collection gets the same list/show/add/edit/delete subcommands; the
//! configured adapter decides where records are kept.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::Write;

use anyhow::Context;
use clap::Parser;

use tripbook::cli::{handle_collection, Cli, CollectionCommand, Command, ConfigCommand};
use tripbook::config::StorageBackend;
use tripbook::{
    init_logging, open_adapter, Config, Destination, Experience, Package, Planner, Record, Review,
    Route,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Destinations(cmd) => run::<Destination>(&config, cmd).await,
        Command::Packages(cmd) => run::<Package>(&config, cmd).await,
        Command::Routes(cmd) => run::<Route>(&config, cmd).await,
        Command::Experiences(cmd) => run::<Experience>(&config, cmd).await,
        Command::Reviews(cmd) => run::<Review>(&config, cmd).await,
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn run<R: Record>(config: &Config, cmd: CollectionCommand) -> anyhow::Result<()> {
    let planner = Planner::new(open_adapter(config).context("failed to open storage")?);

    let mut stdout = std::io::stdout().lock();
    handle_collection::<R, _, _>(&planner, cmd, &config.display, &mut stdout).await?;
    stdout.flush()?;
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                let backend = match config.storage.backend {
                    StorageBackend::Sqlite => "sqlite",
                    StorageBackend::Memory => "memory",
                };
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Backend:            {backend}");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Display]");
                println!("  Currency symbol:    {}", config.display.currency_symbol);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
