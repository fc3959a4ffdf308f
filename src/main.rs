// TISS Batcher - Billing batch generation for TISS lote submission
// Copyright (c) 2026 FinHealth Contributors
// Licensed under the MIT License

use clap::Parser;
use std::process;
use tiss_batcher::cli::{Cli, Commands};
use tiss_batcher::config::{load_config, LoggingConfig};
use tiss_batcher::logging::init_logging;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // File logging settings come from the configuration when it loads.
    // Commands report configuration errors themselves.
    let loaded = match &cli.command {
        Commands::Init(_) => None,
        _ => load_config(&cli.config).ok(),
    };
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| loaded.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let logging_config = loaded
        .map(|c| c.logging)
        .unwrap_or_else(LoggingConfig::default);

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "TISS Batcher - Billing batch generation"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // process::exit skips destructors, so flush the file writer first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Generate(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
