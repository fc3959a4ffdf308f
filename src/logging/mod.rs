//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Console output on stderr
//! - Optional JSON log files with daily or hourly rotation
//!
//! # Example
//!
//! ```no_run
//! use tiss_batcher::logging::init_logging;
//! use tiss_batcher::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use tiss_batcher::log_error_with_context;
/// use tiss_batcher::domain::BatcherError;
///
/// let error = BatcherError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log progress through the windows of a batch run
///
/// # Example
///
/// ```no_run
/// use tiss_batcher::log_window_progress;
///
/// log_window_progress!("generate", 2, 4, 5);
/// ```
#[macro_export]
macro_rules! log_window_progress {
    ($phase:expr, $window:expr, $windows:expr, $tasks:expr) => {
        tracing::debug!(
            phase = $phase,
            window = $window,
            windows = $windows,
            tasks = $tasks,
            "Processing window"
        );
    };
}
