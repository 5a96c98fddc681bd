//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for hybridconn using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// hybridconn - App Service Hybrid Connection reconciler
#[derive(Parser, Debug)]
#[command(name = "hybridconn")]
#[command(version, about, long_about = None)]
#[command(author = "Hybridconn Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "hybridconn.toml", env = "HYBRIDCONN_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "HYBRIDCONN_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, update or replace the declared hybrid connection
    Apply(commands::apply::ApplyArgs),

    /// Read the managed hybrid connection and update the state
    Refresh(commands::refresh::RefreshArgs),

    /// Delete the managed hybrid connection
    Destroy(commands::destroy::DestroyArgs),

    /// Adopt an existing hybrid connection into the state
    Import(commands::import::ImportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Commands {
    /// Whether the command reads the configuration file
    pub fn uses_config(&self) -> bool {
        !matches!(self, Commands::Init(_))
    }
}
