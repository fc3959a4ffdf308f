//! CLI interface and argument parsing
//!
//! The command-line interface for the batcher, built with clap. Commands
//! only parse arguments, call the orchestrator and present results.

pub mod commands;

use clap::{Parser, Subcommand};

/// TISS batcher - groups validated billing records into TISS lote batches
#[derive(Parser, Debug)]
#[command(name = "tiss-batcher")]
#[command(version, about, long_about = None)]
#[command(author = "FinHealth Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = crate::config::DEFAULT_CONFIG_FILE,
        env = "TISS_BATCHER_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TISS_BATCHER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate TISS batches for an organization
    Generate(commands::generate::GenerateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
