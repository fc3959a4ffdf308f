//! Batch (lote) aggregate and lifecycle
//!
//! A [`Batch`] bundles the guides of one insurer and one billing period into a
//! single TISS document. Its insurer and billing period are fixed at
//! construction; only signing and downstream transmission move it through
//! [`BatchStatus`].

use super::errors::BatcherError;
use super::ids::{BatchId, BillingPeriod, InsurerId, OrganizationId};
use super::result::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Batch lifecycle status
///
/// `Pending` is the initial state. `Signed` and `Failed` are produced by the
/// signing step. `Sent`, `Accepted` and `Rejected` belong to transmission,
/// which happens outside this crate. The in-flight processing state is never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Built, not yet signed
    Pending,
    /// Signed document attached
    Signed,
    /// Signing (or an earlier step) failed
    Failed,
    /// Transmitted to the insurer
    Sent,
    /// Accepted by the insurer
    Accepted,
    /// Rejected by the insurer
    Rejected,
}

impl BatchStatus {
    /// Whether moving from `self` to `next` is a legal lifecycle step
    pub fn can_transition_to(self, next: BatchStatus) -> bool {
        use BatchStatus::*;
        matches!(
            (self, next),
            (Pending, Signed)
                | (Pending, Failed)
                | (Signed, Sent)
                | (Sent, Accepted)
                | (Sent, Rejected)
        )
    }

    /// Lowercase status name
    pub fn as_str(self) -> &'static str {
        match self {
            BatchStatus::Pending => "pending",
            BatchStatus::Signed => "signed",
            BatchStatus::Failed => "failed",
            BatchStatus::Sent => "sent",
            BatchStatus::Accepted => "accepted",
            BatchStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one signing attempt, applied to a batch with
/// [`Batch::with_signing_outcome`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningOutcome {
    /// The signed document
    Signed(String),
    /// Why signing did not happen
    Failed(String),
}

/// One TISS lote: the guides of a single insurer and billing period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    id: BatchId,
    organization_id: OrganizationId,
    insurer_id: InsurerId,
    insurer_name: String,
    insurer_ans_code: String,
    period: BillingPeriod,
    lote_number: String,
    guide_count: usize,
    total_amount: Decimal,
    status: BatchStatus,
    document: Option<String>,
    signed_document: Option<String>,
    error: Option<String>,
    created_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
    sent_at: Option<DateTime<Utc>>,
}

impl Batch {
    /// Creates a new builder for constructing a pending Batch
    pub fn builder() -> BatchBuilder {
        BatchBuilder::default()
    }

    pub fn id(&self) -> &BatchId {
        &self.id
    }

    pub fn organization_id(&self) -> &OrganizationId {
        &self.organization_id
    }

    pub fn insurer_id(&self) -> &InsurerId {
        &self.insurer_id
    }

    pub fn insurer_name(&self) -> &str {
        &self.insurer_name
    }

    /// ANS registration code of the insurer
    pub fn insurer_ans_code(&self) -> &str {
        &self.insurer_ans_code
    }

    pub fn period(&self) -> &BillingPeriod {
        &self.period
    }

    /// Sequence number written into the document's `numeroLote`
    pub fn lote_number(&self) -> &str {
        &self.lote_number
    }

    pub fn guide_count(&self) -> usize {
        self.guide_count
    }

    /// Exact sum of every line item's total price in this batch
    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn status(&self) -> BatchStatus {
        self.status
    }

    /// Unsigned document
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn signed_document(&self) -> Option<&str> {
        self.signed_document.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn processed_at(&self) -> Option<DateTime<Utc>> {
        self.processed_at
    }

    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        self.sent_at
    }

    /// Returns a copy updated with a signing attempt's outcome
    ///
    /// Signing may be re-applied to a batch whose earlier attempt failed, so
    /// this does not go through [`BatchStatus::can_transition_to`].
    pub fn with_signing_outcome(mut self, outcome: SigningOutcome) -> Self {
        match outcome {
            SigningOutcome::Signed(signed) => {
                self.signed_document = Some(signed);
                self.status = BatchStatus::Signed;
                self.error = None;
                self.processed_at = Some(Utc::now());
            }
            SigningOutcome::Failed(reason) => {
                self.status = BatchStatus::Failed;
                self.error = Some(reason);
            }
        }
        self
    }

    /// Moves the batch to `next`, rejecting illegal lifecycle steps
    pub fn transition_to(&mut self, next: BatchStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(BatcherError::Validation(format!(
                "Batch {} cannot move from {} to {}",
                self.id, self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }

    /// Records transmission of a signed batch
    pub fn mark_sent(&mut self) -> Result<()> {
        self.transition_to(BatchStatus::Sent)?;
        self.sent_at = Some(Utc::now());
        Ok(())
    }
}

/// Builder for [`Batch`]
///
/// Every batch starts `Pending`. The id is generated unless one is supplied.
#[derive(Debug, Default)]
pub struct BatchBuilder {
    id: Option<BatchId>,
    organization_id: Option<OrganizationId>,
    insurer_id: Option<InsurerId>,
    insurer_name: Option<String>,
    insurer_ans_code: Option<String>,
    period: Option<BillingPeriod>,
    lote_number: Option<String>,
    guide_count: usize,
    total_amount: Decimal,
    document: Option<String>,
}

impl BatchBuilder {
    /// Creates a new BatchBuilder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: BatchId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn organization_id(mut self, organization_id: OrganizationId) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    /// Sets the insurer id, display name and ANS code
    pub fn insurer(
        mut self,
        insurer_id: InsurerId,
        name: impl Into<String>,
        ans_code: impl Into<String>,
    ) -> Self {
        self.insurer_id = Some(insurer_id);
        self.insurer_name = Some(name.into());
        self.insurer_ans_code = Some(ans_code.into());
        self
    }

    pub fn period(mut self, period: BillingPeriod) -> Self {
        self.period = Some(period);
        self
    }

    pub fn lote_number(mut self, lote_number: impl Into<String>) -> Self {
        self.lote_number = Some(lote_number.into());
        self
    }

    pub fn guide_count(mut self, guide_count: usize) -> Self {
        self.guide_count = guide_count;
        self
    }

    pub fn total_amount(mut self, total_amount: Decimal) -> Self {
        self.total_amount = total_amount;
        self
    }

    /// Sets the unsigned document
    pub fn document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    /// Builds the pending Batch
    ///
    /// # Errors
    ///
    /// Returns a validation error if the organization, insurer, period or
    /// lote number is missing.
    pub fn build(self) -> Result<Batch> {
        let missing = |field: &str| BatcherError::Validation(format!("Batch {field} is required"));

        let insurer_id = self.insurer_id.ok_or_else(|| missing("insurer"))?;
        Ok(Batch {
            id: self.id.unwrap_or_else(BatchId::generate),
            organization_id: self
                .organization_id
                .ok_or_else(|| missing("organization_id"))?,
            insurer_id,
            insurer_name: self.insurer_name.unwrap_or_default(),
            insurer_ans_code: self.insurer_ans_code.unwrap_or_default(),
            period: self.period.ok_or_else(|| missing("period"))?,
            lote_number: self.lote_number.ok_or_else(|| missing("lote_number"))?,
            guide_count: self.guide_count,
            total_amount: self.total_amount,
            status: BatchStatus::Pending,
            document: self.document,
            signed_document: None,
            error: None,
            created_at: Utc::now(),
            processed_at: None,
            sent_at: None,
        })
    }
}
