//! Collaborator boundaries.
//!
//! - [`RecordSource`] - persistence layer supplying records, line items and insurers
//! - [`DocumentSigner`] - signing primitive applied to assembled documents
//! - [`json::JsonRecordSource`] - file-backed [`RecordSource`] used by the CLI
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with in-memory implementations. The orchestrator only sees
//! `Arc<dyn RecordSource>` and `Arc<dyn DocumentSigner>`.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tiss_batcher::adapters::json::JsonRecordSource;
//! use tiss_batcher::adapters::RecordSource;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source: Arc<dyn RecordSource> =
//!     Arc::new(JsonRecordSource::from_path("records.json").await?);
//! # Ok(())
//! # }
//! ```

pub mod json;
pub mod signer;
pub mod source;

pub use signer::DocumentSigner;
pub use source::{RecordFilters, RecordSource};
