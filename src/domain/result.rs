//! Result type alias
//!
//! A convenient Result type alias that uses [`BatcherError`] as the error type.

use super::errors::BatcherError;

/// Result type alias for crate operations
///
/// # Examples
///
/// ```
/// use tiss_batcher::domain::result::Result;
/// use tiss_batcher::domain::errors::BatcherError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(BatcherError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, BatcherError>;
