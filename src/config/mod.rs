//! Configuration management for the TISS batcher.
//!
//! # Overview
//!
//! Configuration lives in a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `TISS_BATCHER_<SECTION>_<KEY>` overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tiss_batcher::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tiss-batcher.toml")?;
//!
//! println!("Max guides per batch: {}", config.batching.max_guides_per_batch);
//! println!("Concurrency: {}", config.batching.concurrency);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`BatchingConfig`] - Split size, auto-sign, window width, task timeout
//! - [`DocumentConfig`] - TISS schema version
//! - [`SourceConfig`] - JSON dataset path
//! - [`OutputConfig`] - Output directory
//! - [`LoggingConfig`] - Local JSON file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [batching]
//! max_guides_per_batch = 100
//! auto_sign = true
//! concurrency = 5
//!
//! [source]
//! path = "${TISS_DATA_DIR}/records.json"
//!
//! [output]
//! directory = "batches"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str, DEFAULT_CONFIG_FILE};
pub use schema::{
    ApplicationConfig, BatcherConfig, BatchingConfig, DocumentConfig, LoggingConfig, OutputConfig,
    SourceConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
