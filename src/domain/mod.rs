//! Domain models and types.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`InsurerId`], [`RecordId`], [`BillingPeriod`], ...)
//! - **Billing inputs** ([`BillingRecord`], [`LineItem`], [`InsurerInfo`])
//! - **The batch aggregate** ([`Batch`], [`BatchStatus`], [`SigningOutcome`])
//! - **Signing inputs** ([`SigningCredentials`], [`CertificateInfo`])
//! - **Error types** ([`BatcherError`], [`SigningError`]) and the [`Result`] alias
//!
//! # Type Safety
//!
//! Identifiers are newtypes so different id kinds cannot be mixed:
//!
//! ```rust
//! use tiss_batcher::domain::{InsurerId, RecordId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let insurer = InsurerId::new("ins-1")?;
//! let record = RecordId::new("acc-1")?;
//!
//! // This won't compile - type safety prevents mixing IDs
//! // let wrong: InsurerId = record;
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod billing;
pub mod errors;
pub mod ids;
pub mod result;
pub mod signing;

pub use batch::{Batch, BatchBuilder, BatchStatus, SigningOutcome};
pub use billing::{BillingRecord, InsurerInfo, LineItem};
pub use errors::{BatcherError, SigningError};
pub use ids::{BatchId, BillingPeriod, InsurerId, OrganizationId, RecordId};
pub use result::Result;
pub use signing::{CertificateInfo, SigningCredentials};
