//! Signing adapter abstraction
//!
//! The cryptographic primitive (XML-DSig over the TISS document) is not part
//! of this crate. Implementations wrap whatever signer the deployment uses.

use crate::domain::errors::SigningError;
use crate::domain::signing::SigningCredentials;
use async_trait::async_trait;

/// Signs an assembled TISS document
#[async_trait]
pub trait DocumentSigner: Send + Sync {
    /// Returns the signed document
    ///
    /// # Errors
    ///
    /// Returns a [`SigningError`] if the key, certificate or document is
    /// unusable or the primitive fails.
    async fn sign(
        &self,
        document: &str,
        credentials: &SigningCredentials,
    ) -> std::result::Result<String, SigningError>;
}
