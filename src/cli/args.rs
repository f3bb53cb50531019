//! CLI argument definitions using clap
//!
//! Commands:
//! - tally start --config <path> [--port <port>]
//! - tally check-config --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tally - declarative request validation and scoring service
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the scoring API server
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./tally.json")]
        config: PathBuf,

        /// Override the configured HTTP port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate the configuration file and print the effective settings
    CheckConfig {
        /// Path to configuration file
        #[arg(long, default_value = "./tally.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
