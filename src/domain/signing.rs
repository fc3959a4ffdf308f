//! Signing inputs
//!
//! The certificate/key pair is loaded and validated elsewhere; this crate
//! only carries it to the signing adapter.

use crate::config::secret::{secret_string, SecretString};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Certificate metadata passed through to the signing adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateInfo {
    /// Subject common name
    pub common_name: String,

    /// Certificate serial number
    pub serial_number: String,

    /// Issuer distinguished name
    pub issuer: String,

    /// Start of validity
    pub valid_from: DateTime<Utc>,

    /// End of validity
    pub valid_to: DateTime<Utc>,

    /// Company registration number (CNPJ) embedded in ICP-Brasil certificates
    #[serde(default)]
    pub cnpj: Option<String>,
}

/// Private key, certificate and metadata used to sign batches
///
/// The private key is held as a [`SecretString`] so it is zeroized on drop
/// and redacted from debug output.
#[derive(Debug, Clone)]
pub struct SigningCredentials {
    private_key_pem: SecretString,
    certificate_pem: String,
    certificate_info: CertificateInfo,
}

impl SigningCredentials {
    /// Bundles an already-loaded key pair
    pub fn new(
        private_key_pem: impl Into<String>,
        certificate_pem: impl Into<String>,
        certificate_info: CertificateInfo,
    ) -> Self {
        Self {
            private_key_pem: secret_string(private_key_pem.into()),
            certificate_pem: certificate_pem.into(),
            certificate_info,
        }
    }

    pub fn private_key_pem(&self) -> &SecretString {
        &self.private_key_pem
    }

    pub fn certificate_pem(&self) -> &str {
        &self.certificate_pem
    }

    pub fn certificate_info(&self) -> &CertificateInfo {
        &self.certificate_info
    }
}
