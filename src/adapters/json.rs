//! JSON file record source
//!
//! Serves records, line items and insurers from a single dataset file:
//!
//! ```json
//! {
//!   "records": [{ "id": "acc-1", "organization_id": "org-1", "insurer_id": "ins-1",
//!                 "admission_date": "2026-01-15", "created_at": "2026-01-15T10:00:00Z" }],
//!   "line_items": [{ "record_id": "acc-1", "primary_code": "10101012",
//!                    "description": "Consulta", "quantity": "1",
//!                    "unit_price": "150.00", "total_price": "150.00" }],
//!   "insurers": [{ "id": "ins-1", "name": "Unimed", "ans_code": "326305" }]
//! }
//! ```

use super::source::{RecordFilters, RecordSource};
use crate::domain::billing::{BillingRecord, InsurerInfo, LineItem};
use crate::domain::errors::BatcherError;
use crate::domain::ids::{InsurerId, OrganizationId, RecordId};
use crate::domain::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// On-disk dataset layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub records: Vec<BillingRecord>,

    #[serde(default)]
    pub line_items: Vec<LineItem>,

    #[serde(default)]
    pub insurers: Vec<InsurerInfo>,
}

/// In-memory [`RecordSource`] loaded from a JSON dataset
#[derive(Debug, Clone)]
pub struct JsonRecordSource {
    records: Vec<BillingRecord>,
    line_items: HashMap<RecordId, Vec<LineItem>>,
    insurers: HashMap<InsurerId, InsurerInfo>,
}

impl JsonRecordSource {
    /// Indexes a dataset; line items keep their file order per record
    pub fn from_dataset(dataset: Dataset) -> Self {
        let mut line_items: HashMap<RecordId, Vec<LineItem>> = HashMap::new();
        for item in dataset.line_items {
            line_items
                .entry(item.record_id.clone())
                .or_default()
                .push(item);
        }

        let insurers = dataset
            .insurers
            .into_iter()
            .map(|insurer| (insurer.id.clone(), insurer))
            .collect();

        Self {
            records: dataset.records,
            line_items,
            insurers,
        }
    }

    /// Reads and parses a dataset file
    ///
    /// # Errors
    ///
    /// Returns a source error if the file cannot be read or parsed.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            BatcherError::Source(format!(
                "Failed to read dataset {}: {}",
                path.display(),
                e
            ))
        })?;

        let dataset: Dataset = serde_json::from_str(&contents).map_err(|e| {
            BatcherError::Source(format!(
                "Failed to parse dataset {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!(
            path = %path.display(),
            records = dataset.records.len(),
            line_items = dataset.line_items.len(),
            insurers = dataset.insurers.len(),
            "Dataset loaded"
        );

        Ok(Self::from_dataset(dataset))
    }

    /// Number of records in the dataset
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl RecordSource for JsonRecordSource {
    async fn fetch_records(
        &self,
        organization_id: &OrganizationId,
        filters: &RecordFilters,
    ) -> Result<Vec<BillingRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| &r.organization_id == organization_id && filters.matches(r))
            .cloned()
            .collect())
    }

    async fn fetch_line_items(
        &self,
        record_ids: &[RecordId],
    ) -> Result<HashMap<RecordId, Vec<LineItem>>> {
        Ok(record_ids
            .iter()
            .filter_map(|id| {
                self.line_items
                    .get(id)
                    .map(|items| (id.clone(), items.clone()))
            })
            .collect())
    }

    async fn fetch_insurer(&self, insurer_id: &InsurerId) -> Result<Option<InsurerInfo>> {
        Ok(self.insurers.get(insurer_id).cloned())
    }
}
