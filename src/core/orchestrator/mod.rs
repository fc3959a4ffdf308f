//! Batch orchestration
//!
//! Drives a run end to end: fetch records and line items, group them by
//! insurer and billing period, split oversized groups, build one document per
//! chunk, then optionally sign the batches. Group processing and signing both
//! run in bounded-concurrency windows (see [`window::run_windowed`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tiss_batcher::adapters::json::JsonRecordSource;
//! use tiss_batcher::adapters::RecordFilters;
//! use tiss_batcher::core::orchestrator::BatchOrchestrator;
//! use tiss_batcher::domain::OrganizationId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = Arc::new(JsonRecordSource::from_path("records.json").await?);
//! let orchestrator = BatchOrchestrator::new(source);
//!
//! let result = orchestrator
//!     .generate_batches(&OrganizationId::new("org-1")?, &RecordFilters::none())
//!     .await?;
//!
//! println!("Batches: {}", result.batches.len());
//! println!("Guides: {}", result.total_guides);
//! if !result.is_successful() {
//!     for error in &result.errors {
//!         eprintln!("{error}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod generate;
mod signing;
pub mod summary;
pub mod window;

pub use summary::{GenerationError, GenerationErrorKind, GenerationResult};

use crate::adapters::{DocumentSigner, RecordSource};
use crate::config::BatchingConfig;
use crate::core::document::DEFAULT_SCHEMA_VERSION;
use std::sync::Arc;
use std::time::Duration;

/// Generates and signs TISS batches
///
/// Seeded with [`BatchingConfig::default`] (100 guides per batch, auto-sign
/// on, concurrency 5) unless [`with_config`](Self::with_config) overrides it.
pub struct BatchOrchestrator {
    source: Arc<dyn RecordSource>,
    signer: Option<Arc<dyn DocumentSigner>>,
    config: BatchingConfig,
    schema_version: String,
}

impl BatchOrchestrator {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self {
            source,
            signer: None,
            config: BatchingConfig::default(),
            schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
        }
    }

    pub fn with_config(mut self, config: BatchingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_signer(mut self, signer: Arc<dyn DocumentSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn with_schema_version(mut self, schema_version: impl Into<String>) -> Self {
        self.schema_version = schema_version.into();
        self
    }

    pub fn config(&self) -> &BatchingConfig {
        &self.config
    }

    pub fn has_signer(&self) -> bool {
        self.signer.is_some()
    }

    fn task_timeout(&self) -> Option<Duration> {
        self.config.task_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::RecordFilters;
    use crate::domain::billing::{BillingRecord, InsurerInfo, LineItem};
    use crate::domain::ids::{InsurerId, OrganizationId, RecordId};
    use crate::domain::Result;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct EmptySource;

    #[async_trait]
    impl RecordSource for EmptySource {
        async fn fetch_records(
            &self,
            _organization_id: &OrganizationId,
            _filters: &RecordFilters,
        ) -> Result<Vec<BillingRecord>> {
            Ok(Vec::new())
        }

        async fn fetch_line_items(
            &self,
            _record_ids: &[RecordId],
        ) -> Result<HashMap<RecordId, Vec<LineItem>>> {
            panic!("line items must not be fetched for an empty run");
        }

        async fn fetch_insurer(&self, _insurer_id: &InsurerId) -> Result<Option<InsurerInfo>> {
            Ok(None)
        }
    }

    #[test]
    fn test_default_configuration() {
        let orchestrator = BatchOrchestrator::new(Arc::new(EmptySource));
        assert_eq!(orchestrator.config(), &BatchingConfig::default());
        assert_eq!(orchestrator.config().max_guides_per_batch, 100);
        assert!(orchestrator.config().auto_sign);
        assert_eq!(orchestrator.config().concurrency, 5);
        assert!(orchestrator.task_timeout().is_none());
        assert!(!orchestrator.has_signer());
    }

    #[test]
    fn test_task_timeout_from_config() {
        let config = BatchingConfig {
            task_timeout_secs: Some(3),
            ..BatchingConfig::default()
        };
        let orchestrator = BatchOrchestrator::new(Arc::new(EmptySource)).with_config(config);
        assert_eq!(orchestrator.task_timeout(), Some(Duration::from_secs(3)));
    }

    #[tokio::test]
    async fn test_empty_record_set_short_circuits() {
        let orchestrator = BatchOrchestrator::new(Arc::new(EmptySource));
        let result = orchestrator
            .generate_batches(&OrganizationId::new("org-1").unwrap(), &RecordFilters::none())
            .await
            .unwrap();

        assert!(result.is_successful());
        assert!(result.batches.is_empty());
        assert_eq!(result.total_guides, 0);
    }
}
