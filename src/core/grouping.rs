//! Grouping of billing records by insurer and billing period
//!
//! Each group becomes one or more batches. Groups are returned in the order
//! their first record was seen.

use crate::core::document::money::guide_total;
use crate::domain::billing::{BillingRecord, LineItem};
use crate::domain::ids::{BillingPeriod, InsurerId, RecordId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Composite grouping key: one insurer, one billing period
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    pub insurer_id: InsurerId,
    pub period: BillingPeriod,
}

impl GroupKey {
    pub fn new(insurer_id: InsurerId, period: BillingPeriod) -> Self {
        Self { insurer_id, period }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.insurer_id, self.period)
    }
}

/// Records of one group with their line items
///
/// `line_items` only holds entries for records that have at least one item.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingGroup {
    pub key: GroupKey,
    pub records: Vec<BillingRecord>,
    pub line_items: HashMap<RecordId, Vec<LineItem>>,
}

impl BillingGroup {
    fn new(key: GroupKey) -> Self {
        Self {
            key,
            records: Vec::new(),
            line_items: HashMap::new(),
        }
    }

    /// One guide per record
    pub fn guide_count(&self) -> usize {
        self.records.len()
    }

    /// Line items of a record, empty if it has none
    pub fn items_for(&self, record_id: &RecordId) -> &[LineItem] {
        self.line_items
            .get(record_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Sum of the guide amounts, each rounded once to cents
    ///
    /// Equals the exact sum of every item's total price when prices are
    /// whole cents.
    pub fn total_amount(&self) -> Decimal {
        self.records
            .iter()
            .map(|record| guide_total(self.items_for(&record.id)))
            .sum()
    }

    /// Splits the group into consecutive chunks of at most `max_guides` records
    ///
    /// A group within the limit comes back as a single chunk. A `max_guides`
    /// of zero is treated as one.
    pub fn split(self, max_guides: usize) -> Vec<BillingGroup> {
        let max_guides = max_guides.max(1);
        if self.records.len() <= max_guides {
            return vec![self];
        }

        let BillingGroup {
            key,
            records,
            mut line_items,
        } = self;

        let mut chunks = Vec::with_capacity(records.len().div_ceil(max_guides));
        let mut remaining = records.into_iter().peekable();
        while remaining.peek().is_some() {
            let mut chunk = BillingGroup::new(key.clone());
            for record in remaining.by_ref().take(max_guides) {
                if let Some(items) = line_items.remove(&record.id) {
                    chunk.line_items.insert(record.id.clone(), items);
                }
                chunk.records.push(record);
            }
            chunks.push(chunk);
        }
        chunks
    }
}

/// Partitions records by (insurer, billing period) and attaches line items
///
/// Records without an insurer are skipped silently. A record id seen a
/// second time is dropped so its guide and items are billed once.
pub fn group_records(
    records: Vec<BillingRecord>,
    line_items: &HashMap<RecordId, Vec<LineItem>>,
) -> Vec<BillingGroup> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<BillingGroup> = Vec::new();
    let mut seen: HashSet<RecordId> = HashSet::new();
    let mut skipped = 0usize;
    let mut duplicates = 0usize;

    for record in records {
        let Some(insurer_id) = record.insurer_id.clone() else {
            skipped += 1;
            continue;
        };
        if !seen.insert(record.id.clone()) {
            duplicates += 1;
            continue;
        }
        let key = GroupKey::new(insurer_id, record.billing_period());

        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(BillingGroup::new(key));
            groups.len() - 1
        });
        let group = &mut groups[slot];

        if let Some(items) = line_items.get(&record.id).filter(|items| !items.is_empty()) {
            group.line_items.insert(record.id.clone(), items.clone());
        }
        group.records.push(record);
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Records without insurer excluded from grouping");
    }
    if duplicates > 0 {
        tracing::warn!(duplicates, "Duplicate record ids excluded from grouping");
    }

    groups
}
