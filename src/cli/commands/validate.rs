//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the batcher configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates, so a loaded configuration is a valid one.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Max Guides per Batch: {}",
            config.batching.max_guides_per_batch
        );
        println!("  Auto Sign: {}", config.batching.auto_sign);
        println!("  Concurrency: {}", config.batching.concurrency);
        match config.batching.task_timeout_secs {
            Some(secs) => println!("  Task Timeout: {secs}s"),
            None => println!("  Task Timeout: none"),
        }
        println!("  Schema Version: {}", config.document.schema_version);
        println!(
            "  Record Source: {}",
            config.source.path.as_deref().unwrap_or("(not set)")
        );
        println!("  Output Directory: {}", config.output.directory);
        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(0)
    }
}
