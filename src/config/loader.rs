//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::BatcherConfig;
use crate::domain::errors::BatcherError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "tiss-batcher.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into BatcherConfig
/// 4. Applies environment variable overrides (TISS_BATCHER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - An override cannot be parsed
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use tiss_batcher::config::loader::load_config;
///
/// let config = load_config("tiss-batcher.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<BatcherConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BatcherError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BatcherError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Same as [`load_config`] but from an in-memory TOML document
pub fn load_config_from_str(contents: &str) -> Result<BatcherConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: BatcherConfig = toml::from_str(&contents)
        .map_err(|e| BatcherError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        BatcherError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(BatcherError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn parse_override<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        BatcherError::Configuration(format!(
            "Invalid value '{}' for environment variable {}",
            value, name
        ))
    })
}

fn override_with<T: FromStr>(name: &str, target: &mut T) -> Result<()> {
    if let Ok(val) = std::env::var(name) {
        *target = parse_override(name, &val)?;
    }
    Ok(())
}

/// Applies environment variable overrides using the TISS_BATCHER_* prefix
///
/// Environment variables follow the pattern: TISS_BATCHER_<SECTION>_<KEY>
/// For example: TISS_BATCHER_BATCHING_CONCURRENCY, TISS_BATCHER_SOURCE_PATH
fn apply_env_overrides(config: &mut BatcherConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("TISS_BATCHER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Batching overrides
    override_with(
        "TISS_BATCHER_BATCHING_MAX_GUIDES_PER_BATCH",
        &mut config.batching.max_guides_per_batch,
    )?;
    override_with(
        "TISS_BATCHER_BATCHING_AUTO_SIGN",
        &mut config.batching.auto_sign,
    )?;
    override_with(
        "TISS_BATCHER_BATCHING_CONCURRENCY",
        &mut config.batching.concurrency,
    )?;
    if let Ok(val) = std::env::var("TISS_BATCHER_BATCHING_TASK_TIMEOUT_SECS") {
        config.batching.task_timeout_secs = if val.trim().is_empty() {
            None
        } else {
            Some(parse_override(
                "TISS_BATCHER_BATCHING_TASK_TIMEOUT_SECS",
                &val,
            )?)
        };
    }

    // Document overrides
    if let Ok(val) = std::env::var("TISS_BATCHER_DOCUMENT_SCHEMA_VERSION") {
        config.document.schema_version = val;
    }

    // Source and output overrides
    if let Ok(val) = std::env::var("TISS_BATCHER_SOURCE_PATH") {
        config.source.path = Some(val);
    }
    if let Ok(val) = std::env::var("TISS_BATCHER_OUTPUT_DIRECTORY") {
        config.output.directory = val;
    }

    // Logging overrides
    override_with(
        "TISS_BATCHER_LOGGING_LOCAL_ENABLED",
        &mut config.logging.local_enabled,
    )?;
    if let Ok(val) = std::env::var("TISS_BATCHER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("TISS_BATCHER_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
