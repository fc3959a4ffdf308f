//! Configuration schema types
//!
//! Maps the TOML configuration file onto typed sections with serde defaults.

use serde::{Deserialize, Serialize};

/// Main configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional; a file containing only `[source]` is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatcherConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Grouping, splitting and concurrency settings
    #[serde(default)]
    pub batching: BatchingConfig,

    /// TISS document settings
    #[serde(default)]
    pub document: DocumentConfig,

    /// File-backed record source
    #[serde(default)]
    pub source: SourceConfig,

    /// Where generated batches are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BatcherConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.batching.validate()?;
        self.document.validate()?;
        self.output.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Batch generation and signing settings
///
/// The default is 100 guides per batch, auto-sign on, and 5 concurrent
/// tasks per window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchingConfig {
    /// Upper bound on guides in one batch; larger groups are split
    #[serde(default = "default_max_guides_per_batch")]
    pub max_guides_per_batch: usize,

    /// Sign batches right after generation when credentials are available
    #[serde(default = "default_true")]
    pub auto_sign: bool,

    /// Window width for both document assembly and signing
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Optional per-task timeout in seconds (unset = wait indefinitely)
    #[serde(default)]
    pub task_timeout_secs: Option<u64>,
}

impl BatchingConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.max_guides_per_batch == 0 || self.max_guides_per_batch > 10_000 {
            return Err(format!(
                "batching.max_guides_per_batch must be between 1 and 10000, got {}",
                self.max_guides_per_batch
            ));
        }

        if self.concurrency == 0 || self.concurrency > 100 {
            return Err(format!(
                "batching.concurrency must be between 1 and 100, got {}",
                self.concurrency
            ));
        }

        if self.task_timeout_secs == Some(0) {
            return Err("batching.task_timeout_secs must be > 0 when set".to_string());
        }

        Ok(())
    }
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            max_guides_per_batch: default_max_guides_per_batch(),
            auto_sign: true,
            concurrency: default_concurrency(),
            task_timeout_secs: None,
        }
    }
}

/// TISS document settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// TISS schema version written to `versaoPadrao`
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
}

impl DocumentConfig {
    fn validate(&self) -> Result<(), String> {
        let parts: Vec<&str> = self.schema_version.split('.').collect();
        let well_formed = parts.len() == 3
            && parts[0].len() == 1
            && parts[1].len() == 2
            && parts[2].len() == 2
            && parts
                .iter()
                .all(|p| p.chars().all(|c| c.is_ascii_digit()));

        if !well_formed {
            return Err(format!(
                "document.schema_version must look like 3.05.00, got '{}'",
                self.schema_version
            ));
        }
        Ok(())
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
        }
    }
}

/// JSON dataset used by the file-backed record source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to the dataset file
    #[serde(default)]
    pub path: Option<String>,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one XML file per batch and a manifest
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.directory.trim().is_empty() {
            return Err("output.directory cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_guides_per_batch() -> usize {
    100
}

fn default_concurrency() -> usize {
    5
}

fn default_schema_version() -> String {
    "3.05.00".to_string()
}

fn default_output_directory() -> String {
    "batches".to_string()
}

fn default_local_path() -> String {
    "/var/log/tiss-batcher".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_batching_defaults() {
        let config = BatchingConfig::default();
        assert_eq!(config.max_guides_per_batch, 100);
        assert!(config.auto_sign);
        assert_eq!(config.concurrency, 5);
        assert!(config.task_timeout_secs.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_batching_validation() {
        let mut config = BatchingConfig::default();

        config.max_guides_per_batch = 0;
        assert!(config.validate().is_err());

        config.max_guides_per_batch = 10_001;
        assert!(config.validate().is_err());

        config.max_guides_per_batch = 100;
        config.concurrency = 0;
        assert!(config.validate().is_err());

        config.concurrency = 101;
        assert!(config.validate().is_err());

        config.concurrency = 5;
        config.task_timeout_secs = Some(0);
        assert!(config.validate().is_err());

        config.task_timeout_secs = Some(30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_document_schema_version_validation() {
        let mut config = DocumentConfig::default();
        assert!(config.validate().is_ok());

        config.schema_version = "4.01.00".to_string();
        assert!(config.validate().is_ok());

        config.schema_version = "4.1".to_string();
        assert!(config.validate().is_err());

        config.schema_version = "v.05.00".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "size".to_string();
        assert!(config.validate().is_err());

        config.local_rotation = "hourly".to_string();
        config.local_enabled = true;
        config.local_path = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: BatcherConfig = toml::from_str("").unwrap();
        assert_eq!(config.batching, BatchingConfig::default());
        assert_eq!(config.document.schema_version, "3.05.00");
        assert_eq!(config.output.directory, "batches");
        assert!(config.source.path.is_none());
        assert!(config.validate().is_ok());
    }
}
