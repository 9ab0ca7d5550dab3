//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Operations available on every collection.
#[derive(Debug, Clone, Subcommand)]
pub enum CollectionCommand {
    /// List all records in order
    List(ListArgs),

    /// Show one record
    Show {
        /// Record id
        id: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Add a record from name=value pairs
    Add {
        /// Field values, e.g. name=Paris country=France city=Paris
        #[arg(required = true, value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },

    /// Edit a record; given fields replace its current values
    Edit {
        /// Record id
        id: String,

        /// Field values to change
        #[arg(value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },

    /// Delete a record
    Delete {
        /// Record id
        id: String,
    },
}

/// List command arguments.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Configuration commands.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per record
    #[default]
    Plain,
    /// The stored JSON
    Json,
}
