//! Record source abstraction
//!
//! This module defines the trait the persistence layer implements to feed
//! batch generation.

use crate::domain::billing::{BillingRecord, InsurerInfo, LineItem};
use crate::domain::ids::{BillingPeriod, InsurerId, OrganizationId, RecordId};
use crate::domain::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Optional narrowing of the records considered for a run
///
/// Passed through verbatim to [`RecordSource::fetch_records`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilters {
    /// Only records billed to this insurer
    #[serde(default)]
    pub insurer_id: Option<InsurerId>,

    /// Only records in this billing period
    #[serde(default)]
    pub period: Option<BillingPeriod>,
}

impl RecordFilters {
    /// No filtering
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_insurer(mut self, insurer_id: InsurerId) -> Self {
        self.insurer_id = Some(insurer_id);
        self
    }

    pub fn with_period(mut self, period: BillingPeriod) -> Self {
        self.period = Some(period);
        self
    }

    /// Returns true if the record passes both filters
    ///
    /// The period is computed the same way the grouper computes it.
    pub fn matches(&self, record: &BillingRecord) -> bool {
        if let Some(insurer_id) = &self.insurer_id {
            if record.insurer_id.as_ref() != Some(insurer_id) {
                return false;
            }
        }
        if let Some(period) = &self.period {
            if &record.billing_period() != period {
                return false;
            }
        }
        true
    }
}

/// Persistence collaborator supplying validated billing inputs
///
/// Every call is a suspension point. The orchestrator never holds more than
/// `concurrency` insurer lookups in flight at once.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the candidate records of an organization
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be read.
    async fn fetch_records(
        &self,
        organization_id: &OrganizationId,
        filters: &RecordFilters,
    ) -> Result<Vec<BillingRecord>>;

    /// Fetch the line items of many records in one call
    ///
    /// Records without line items may be absent from the returned map.
    ///
    /// # Errors
    ///
    /// Returns an error if the line items cannot be read.
    async fn fetch_line_items(
        &self,
        record_ids: &[RecordId],
    ) -> Result<HashMap<RecordId, Vec<LineItem>>>;

    /// Resolve insurer metadata, `None` if the insurer is unknown
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails.
    async fn fetch_insurer(&self, insurer_id: &InsurerId) -> Result<Option<InsurerInfo>>;
}
