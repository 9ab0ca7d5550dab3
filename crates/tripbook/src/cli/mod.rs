//! Command-line interface for tripbook.
//!
//! One subcommand per collection, each offering the same record operations.

mod commands;
mod handlers;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{CollectionCommand, ConfigCommand, ListArgs, OutputFormat};
pub use handlers::handle_collection;

/// tripbook - Plan trips from the terminal
///
/// Keeps destinations, packages, routes, experiences and reviews in a local
/// store.
#[derive(Debug, Parser)]
#[command(name = "tripbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Places to visit
    #[command(subcommand)]
    Destinations(CollectionCommand),

    /// Priced travel packages
    #[command(subcommand)]
    Packages(CollectionCommand),

    /// Itinerary stops
    #[command(subcommand)]
    Routes(CollectionCommand),

    /// Experiences, tips and places
    #[command(subcommand)]
    Experiences(CollectionCommand),

    /// Rated reviews
    #[command(subcommand)]
    Reviews(CollectionCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
