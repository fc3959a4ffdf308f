//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers that flow through batch generation.
//! Keeping them distinct prevents an insurer id from being passed where a
//! record id is expected, and lets [`BillingPeriod`] guarantee its `YYYY-MM`
//! shape once at construction.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new ", $label, ", rejecting blank values")]
            pub fn new(id: impl Into<String>) -> Result<Self, String> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(concat!($label, " cannot be empty").to_string());
                }
                Ok(Self(id))
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes self and returns the inner String
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Organization (healthcare provider) identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use tiss_batcher::domain::ids::OrganizationId;
    ///
    /// let org = OrganizationId::new("org-1").unwrap();
    /// assert_eq!(org.as_str(), "org-1");
    /// assert!(OrganizationId::new("  ").is_err());
    /// ```
    OrganizationId,
    "Organization ID"
);

string_id!(
    /// Health insurer (operadora) identifier as known to the persistence layer
    InsurerId,
    "Insurer ID"
);

string_id!(
    /// Billing record (medical account) identifier
    RecordId,
    "Record ID"
);

string_id!(
    /// Generated batch identifier
    BatchId,
    "Batch ID"
);

impl BatchId {
    /// Generates a fresh, globally unique batch id of the form `batch-<uuid>`
    pub fn generate() -> Self {
        Self(format!("batch-{}", uuid::Uuid::new_v4().simple()))
    }
}

/// Billing period (competência) as a `YYYY-MM` year-month string
///
/// # Examples
///
/// ```
/// use tiss_batcher::domain::ids::BillingPeriod;
/// use chrono::NaiveDate;
///
/// let period = BillingPeriod::from_date(&NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
/// assert_eq!(period.as_str(), "2026-01");
/// assert!(BillingPeriod::new("2026-13").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BillingPeriod(String);

impl BillingPeriod {
    /// Creates a billing period from a `YYYY-MM` string
    pub fn new(period: impl Into<String>) -> Result<Self, String> {
        let period = period.into();
        let invalid = || format!("Invalid billing period '{period}'. Expected format: YYYY-MM");

        let (year, month) = period.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        match month.parse::<u32>() {
            Ok(m) if (1..=12).contains(&m) => {}
            _ => return Err(invalid()),
        }

        Ok(Self(period))
    }

    /// Truncates a date (or timestamp) to its year-month
    pub fn from_date<D: Datelike>(date: &D) -> Self {
        Self(format!("{:04}-{:02}", date.year(), date.month()))
    }

    /// Returns the period as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BillingPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for BillingPeriod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BillingPeriod> for String {
    fn from(period: BillingPeriod) -> Self {
        period.0
    }
}

impl AsRef<str> for BillingPeriod {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_string_ids_reject_blank() {
        assert!(InsurerId::new("").is_err());
        assert!(RecordId::new("   ").is_err());
        assert_eq!(InsurerId::new("ins-1").unwrap().as_str(), "ins-1");
    }

    #[test]
    fn test_id_with_separator_characters() {
        let id = InsurerId::from_str("ins|2026-01").unwrap();
        assert_eq!(id.to_string(), "ins|2026-01");
    }

    #[test]
    fn test_batch_id_generate_unique() {
        let a = BatchId::generate();
        let b = BatchId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("batch-"));
    }

    #[test]
    fn test_billing_period_validation() {
        assert!(BillingPeriod::new("2026-01").is_ok());
        assert!(BillingPeriod::new("2026-12").is_ok());
        assert!(BillingPeriod::new("2026-00").is_err());
        assert!(BillingPeriod::new("2026-1").is_err());
        assert!(BillingPeriod::new("26-01").is_err());
        assert!(BillingPeriod::new("2026/01").is_err());
        assert!(BillingPeriod::new("").is_err());
    }

    #[test]
    fn test_billing_period_from_date_and_timestamp() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        assert_eq!(BillingPeriod::from_date(&date).as_str(), "2026-02");

        let ts = Utc.with_ymd_and_hms(2025, 11, 3, 23, 59, 59).unwrap();
        assert_eq!(BillingPeriod::from_date(&ts).as_str(), "2025-11");
    }

    #[test]
    fn test_ids_serde_roundtrip_as_plain_strings() {
        let json = serde_json::to_string(&InsurerId::new("ins-1").unwrap()).unwrap();
        assert_eq!(json, "\"ins-1\"");

        let period: BillingPeriod = serde_json::from_str("\"2026-03\"").unwrap();
        assert_eq!(period.as_str(), "2026-03");

        assert!(serde_json::from_str::<BillingPeriod>("\"2026-3\"").is_err());
    }
}
