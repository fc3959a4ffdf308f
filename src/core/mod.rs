//! Core batch generation logic.
//!
//! # Modules
//!
//! - [`grouping`] - Partitioning records by (insurer, billing period)
//! - [`document`] - TISS lote XML assembly and monetary formatting
//! - [`orchestrator`] - Windowed generation and signing of batches
//!
//! # Generation Workflow
//!
//! 1. **Fetch**: Load candidate records, then their line items in one call
//! 2. **Group**: Partition by insurer and billing period, skipping records without insurer
//! 3. **Split**: Cut groups larger than `max_guides_per_batch` into chunks
//! 4. **Build**: Resolve the insurer and build one document per chunk, `concurrency` groups at a time
//! 5. **Aggregate**: Sum guides and amounts, collect per-group errors
//! 6. **Sign** (optional): Sign every batch, `concurrency` at a time

pub mod document;
pub mod grouping;
pub mod orchestrator;
