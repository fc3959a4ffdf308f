// TISS Batcher - Billing batch generation for TISS lote submission
// Copyright (c) 2026 FinHealth Contributors
// Licensed under the MIT License

//! # TISS Batcher
//!
//! Groups validated healthcare billing records into TISS batches (lotes) for
//! submission to health insurers.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Grouping** records by (insurer, billing period)
//! - **Splitting** groups larger than the configured guide limit
//! - **Building** one TISS lote XML document per batch with exact decimal totals
//! - **Signing** batches through a pluggable signer, never failing the caller
//!
//! Groups and signatures are processed in bounded-concurrency windows; one
//! failing group never affects the others.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Grouping, document assembly and orchestration
//! - [`adapters`] - Record source and signer seams, JSON record source
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tiss_batcher::adapters::json::JsonRecordSource;
//! use tiss_batcher::adapters::RecordFilters;
//! use tiss_batcher::config::load_config;
//! use tiss_batcher::core::orchestrator::BatchOrchestrator;
//! use tiss_batcher::domain::OrganizationId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("tiss-batcher.toml")?;
//!     let source = Arc::new(JsonRecordSource::from_path("records.json").await?);
//!
//!     let orchestrator = BatchOrchestrator::new(source).with_config(config.batching);
//!     let result = orchestrator
//!         .generate_batches(&OrganizationId::new("org-1")?, &RecordFilters::none())
//!         .await?;
//!
//!     println!("Generated {} batches, {} guides", result.batches.len(), result.total_guides);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Run-level failures use [`domain::BatcherError`]. Per-group failures are
//! collected in [`core::orchestrator::GenerationResult::errors`] and signing
//! failures are recorded on the batch itself.
//!
//! ## Logging
//!
//! Structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(batches = 3, "Batch generation completed");
//! warn!(insurer_id = "ins-9", "Insurer not found");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
