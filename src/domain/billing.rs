//! Billing input models
//!
//! Validated records, their line items and insurer metadata as supplied by
//! the persistence layer. These are read-only to batch generation.

use super::ids::{BillingPeriod, InsurerId, OrganizationId, RecordId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fallback procedure code when neither coding scheme is present
pub const UNKNOWN_PROCEDURE_CODE: &str = "00000000";

/// One validated account/encounter, billed as one guide
///
/// # Examples
///
/// ```
/// use tiss_batcher::domain::billing::BillingRecord;
/// use tiss_batcher::domain::ids::{InsurerId, OrganizationId, RecordId};
/// use chrono::{NaiveDate, Utc};
///
/// let record = BillingRecord::new(
///     RecordId::new("acc-1").unwrap(),
///     OrganizationId::new("org-1").unwrap(),
///     Utc::now(),
/// )
/// .with_insurer(InsurerId::new("ins-1").unwrap())
/// .with_admission_date(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
///
/// assert_eq!(record.billing_period().as_str(), "2026-01");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRecord {
    /// Record identifier
    pub id: RecordId,

    /// Owning organization
    pub organization_id: OrganizationId,

    /// Beneficiary reference (insurance card number)
    #[serde(default)]
    pub patient_id: Option<String>,

    /// Insurer; records without one are never batched
    #[serde(default)]
    pub insurer_id: Option<InsurerId>,

    /// Admission date, the primary source of the billing period
    #[serde(default)]
    pub admission_date: Option<NaiveDate>,

    /// Creation timestamp, used for the billing period when admission is absent
    pub created_at: DateTime<Utc>,

    /// Externally assigned guide number, if any
    #[serde(default)]
    pub guide_number: Option<String>,
}

impl BillingRecord {
    /// Creates a record with only the mandatory fields set
    pub fn new(id: RecordId, organization_id: OrganizationId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            organization_id,
            patient_id: None,
            insurer_id: None,
            admission_date: None,
            created_at,
            guide_number: None,
        }
    }

    /// Sets the insurer
    pub fn with_insurer(mut self, insurer_id: InsurerId) -> Self {
        self.insurer_id = Some(insurer_id);
        self
    }

    /// Sets the admission date
    pub fn with_admission_date(mut self, date: NaiveDate) -> Self {
        self.admission_date = Some(date);
        self
    }

    /// Sets the beneficiary reference
    pub fn with_patient(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }

    /// Sets an externally assigned guide number
    pub fn with_guide_number(mut self, guide_number: impl Into<String>) -> Self {
        self.guide_number = Some(guide_number.into());
        self
    }

    /// Year-month of the admission date, or of the creation date if absent
    pub fn billing_period(&self) -> BillingPeriod {
        match &self.admission_date {
            Some(date) => BillingPeriod::from_date(date),
            None => BillingPeriod::from_date(&self.created_at),
        }
    }
}

/// One billed procedure tied to a [`BillingRecord`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Record this procedure was billed under
    pub record_id: RecordId,

    /// Primary (TUSS) procedure code
    #[serde(default)]
    pub primary_code: Option<String>,

    /// Fallback (SIGTAP) procedure code
    #[serde(default)]
    pub fallback_code: Option<String>,

    /// Free-text description
    pub description: String,

    /// Executed quantity
    pub quantity: Decimal,

    /// Unit price
    pub unit_price: Decimal,

    /// Total price as billed
    pub total_price: Decimal,

    /// When the procedure was performed
    #[serde(default)]
    pub performed_at: Option<DateTime<Utc>>,
}

impl LineItem {
    /// Creates a line item coded with the primary scheme
    pub fn new(
        record_id: RecordId,
        primary_code: impl Into<String>,
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
        total_price: Decimal,
    ) -> Self {
        Self {
            record_id,
            primary_code: Some(primary_code.into()),
            fallback_code: None,
            description: description.into(),
            quantity,
            unit_price,
            total_price,
            performed_at: None,
        }
    }

    /// Replaces the coding with a fallback-scheme code only
    pub fn with_fallback_code(mut self, code: impl Into<String>) -> Self {
        self.primary_code = None;
        self.fallback_code = Some(code.into());
        self
    }

    /// Sets the execution timestamp
    pub fn with_performed_at(mut self, performed_at: DateTime<Utc>) -> Self {
        self.performed_at = Some(performed_at);
        self
    }

    /// Primary code, else fallback code, else [`UNKNOWN_PROCEDURE_CODE`]
    pub fn procedure_code(&self) -> &str {
        self.primary_code
            .as_deref()
            .filter(|c| !c.is_empty())
            .or_else(|| self.fallback_code.as_deref().filter(|c| !c.is_empty()))
            .unwrap_or(UNKNOWN_PROCEDURE_CODE)
    }
}

/// Insurer display name and regulator-assigned (ANS) code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsurerInfo {
    /// Insurer identifier
    pub id: InsurerId,

    /// Display name
    pub name: String,

    /// ANS registration code
    pub ans_code: String,
}

impl InsurerInfo {
    /// Creates insurer metadata
    pub fn new(id: InsurerId, name: impl Into<String>, ans_code: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ans_code: ans_code.into(),
        }
    }
}
