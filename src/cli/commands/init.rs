//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = crate::config::DEFAULT_CONFIG_FILE)]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing TISS batcher configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Point [source] path at your records dataset");
                println!("  2. Validate configuration: tiss-batcher validate-config");
                println!("  3. Generate batches: tiss-batcher generate --org <ORG_ID>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# TISS Batcher Configuration File

[application]
log_level = "info"

[batching]
max_guides_per_batch = 100
auto_sign = true
concurrency = 5

[document]
schema_version = "3.05.00"

[source]
path = "records.json"

[output]
directory = "batches"

[logging]
local_enabled = false
local_path = "/var/log/tiss-batcher"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# TISS Batcher Configuration File
#
# Every value below is the default unless stated otherwise.
# Values may reference environment variables with ${VAR_NAME} and any key
# can be overridden with TISS_BATCHER_<SECTION>_<KEY>.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Batching
# ============================================================================
[batching]
# Maximum guides in one lote (1-10000). Larger groups are split.
max_guides_per_batch = 100

# Sign batches after generation when credentials are available
auto_sign = true

# Groups (and signatures) processed at the same time (1-100)
concurrency = 5

# Optional per-task timeout in seconds
# task_timeout_secs = 30

# ============================================================================
# Document
# ============================================================================
[document]
# TISS schema version written into the lote header
schema_version = "3.05.00"

# ============================================================================
# Record Source
# ============================================================================
[source]
# JSON dataset with records, line_items and insurers
path = "${TISS_DATA_DIR}/records.json"

# ============================================================================
# Output
# ============================================================================
[output]
# One <batch-id>.xml per batch plus manifest.json
directory = "batches"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Local log directory
local_path = "/var/log/tiss-batcher"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;
    use tempfile::TempDir;

    #[test]
    fn test_generate_minimal_config_is_loadable() {
        let config = load_config_from_str(&InitArgs::generate_minimal_config()).unwrap();
        assert_eq!(config.batching.max_guides_per_batch, 100);
        assert_eq!(config.source.path.as_deref(), Some("records.json"));
    }

    #[test]
    fn test_generate_config_with_examples() {
        let config = InitArgs::generate_config_with_examples();
        assert!(config.contains("# TISS Batcher Configuration File"));
        assert!(config.contains("max_guides_per_batch"));
        assert!(config.contains("task_timeout_secs"));
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("tiss-batcher.toml");
        let mut args = InitArgs {
            output: output.to_string_lossy().into_owned(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(output.exists());
        assert_eq!(args.execute().await.unwrap(), 2);

        args.force = true;
        assert_eq!(args.execute().await.unwrap(), 0);
    }
}
