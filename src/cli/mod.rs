//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for PiiGuard using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// PiiGuard - PII detection and anonymization service
#[derive(Parser, Debug)]
#[command(name = "piiguard")]
#[command(version, about, long_about = None)]
#[command(author = "PiiGuard Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "piiguard.toml", env = "PIIGUARD_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PIIGUARD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
