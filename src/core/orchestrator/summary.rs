//! Generation results and per-group errors

use crate::core::grouping::GroupKey;
use crate::domain::batch::Batch;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Kind of a per-group failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationErrorKind {
    /// The insurer of the group has no metadata
    InsurerNotFound,
    /// The insurer lookup itself failed
    Source,
    /// A chunk's document or batch could not be built
    Build,
    /// The group task exceeded the configured timeout
    Timeout,
    /// The group task panicked
    Panicked,
}

/// One group's failure, reported as data in [`GenerationResult::errors`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    pub group: Option<GroupKey>,
    pub message: String,
}

impl GenerationError {
    pub fn new(kind: GenerationErrorKind, group: Option<GroupKey>, message: impl Into<String>) -> Self {
        Self {
            kind,
            group,
            message: message.into(),
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for GenerationError {}

/// Outcome of a generation run
///
/// Partial success is normal: `batches` can be non-empty while `errors`
/// lists the groups that produced nothing.
#[derive(Debug, Clone, Default)]
pub struct GenerationResult {
    pub batches: Vec<Batch>,
    pub total_guides: usize,
    pub total_amount: Decimal,
    pub errors: Vec<GenerationError>,
}

impl GenerationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a batch and its guides and amount to the totals
    pub fn add_batch(&mut self, batch: Batch) {
        self.total_guides += batch.guide_count();
        self.total_amount += batch.total_amount();
        self.batches.push(batch);
    }

    pub fn add_error(&mut self, error: GenerationError) {
        self.errors.push(error);
    }

    /// True iff no group failed
    pub fn is_successful(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error messages in the order they were recorded
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Replaces the batches, recomputing totals
    pub(crate) fn replace_batches(&mut self, batches: Vec<Batch>) {
        self.batches.clear();
        self.total_guides = 0;
        self.total_amount = Decimal::ZERO;
        for batch in batches {
            self.add_batch(batch);
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            batches = self.batches.len(),
            total_guides = self.total_guides,
            total_amount = %self.total_amount,
            errors = self.errors.len(),
            success = self.is_successful(),
            "Batch generation completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Batch generation completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    kind = ?error.kind,
                    group = %error.group.as_ref().map(ToString::to_string).unwrap_or_default(),
                    message = %error.message,
                    "Generation error"
                );
            }
        }
    }
}
