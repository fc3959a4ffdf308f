//! Batch signing

use super::summary::{GenerationError, GenerationErrorKind, GenerationResult};
use super::window::run_windowed;
use super::BatchOrchestrator;
use crate::adapters::{DocumentSigner, RecordFilters};
use crate::core::grouping::GroupKey;
use crate::domain::batch::{Batch, SigningOutcome};
use crate::domain::errors::BatcherError;
use crate::domain::ids::{BatchId, OrganizationId};
use crate::domain::signing::SigningCredentials;
use crate::domain::Result;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

impl BatchOrchestrator {
    /// Signs one batch
    ///
    /// Never fails: the returned batch is either `Signed` with the signed
    /// document attached, or `Failed` with the reason in its error field.
    /// A batch without a document is failed without calling the signer.
    pub async fn sign_batch(&self, batch: Batch, credentials: &SigningCredentials) -> Batch {
        sign_one(self.signer.as_deref(), batch, credentials, self.task_timeout()).await
    }

    /// Signs batches in bounded-concurrency windows
    ///
    /// Every batch comes back signed or failed. The only way a batch goes
    /// missing from the output is a signer panic, which is logged.
    pub async fn sign_batches(
        &self,
        batches: Vec<Batch>,
        credentials: &SigningCredentials,
    ) -> Vec<Batch> {
        if batches.is_empty() {
            return batches;
        }

        let ids: Vec<BatchId> = batches.iter().map(|b| b.id().clone()).collect();
        let credentials = Arc::new(credentials.clone());
        let signer = self.signer.clone();
        let timeout = self.task_timeout();

        tracing::info!(
            batches = ids.len(),
            concurrency = self.config.concurrency,
            "Signing batches"
        );

        let results = run_windowed("sign", batches, self.config.concurrency, |batch| {
            let credentials = credentials.clone();
            let signer = signer.clone();
            async move { sign_one(signer.as_deref(), batch, &credentials, timeout).await }
        })
        .await;

        ids.into_iter()
            .zip(results)
            .filter_map(|(id, result)| match result {
                Ok(batch) => Some(batch),
                Err(join_error) => {
                    tracing::error!(
                        batch_id = %id,
                        error = %join_error,
                        "Signing task aborted, batch dropped"
                    );
                    None
                }
            })
            .collect()
    }

    /// Generates batches, then signs them when auto-sign is on and both a
    /// signer and credentials are available
    ///
    /// Otherwise the batches stay `Pending`. A batch lost to a signer panic
    /// is reported as a `Panicked` error for its group.
    ///
    /// # Errors
    ///
    /// Same as [`generate_batches`](Self::generate_batches).
    pub async fn generate_and_sign(
        &self,
        organization_id: &OrganizationId,
        filters: &RecordFilters,
        credentials: Option<&SigningCredentials>,
    ) -> Result<GenerationResult> {
        let mut result = self.generate_batches(organization_id, filters).await?;

        match credentials {
            Some(credentials)
                if self.config.auto_sign && self.signer.is_some() && !result.batches.is_empty() =>
            {
                let batches = std::mem::take(&mut result.batches);
                let submitted: Vec<(BatchId, GroupKey)> = batches
                    .iter()
                    .map(|b| {
                        let key = GroupKey::new(b.insurer_id().clone(), b.period().clone());
                        (b.id().clone(), key)
                    })
                    .collect();

                let signed = self.sign_batches(batches, credentials).await;

                let returned: HashSet<&BatchId> = signed.iter().map(Batch::id).collect();
                let lost: Vec<(BatchId, GroupKey)> = submitted
                    .into_iter()
                    .filter(|(id, _)| !returned.contains(id))
                    .collect();
                for (id, key) in lost {
                    result.add_error(GenerationError::new(
                        GenerationErrorKind::Panicked,
                        Some(key),
                        format!("Batch {id} was lost while signing"),
                    ));
                }

                result.replace_batches(signed);
            }
            _ => {
                tracing::debug!(
                    auto_sign = self.config.auto_sign,
                    has_signer = self.signer.is_some(),
                    has_credentials = credentials.is_some(),
                    "Batches left unsigned"
                );
            }
        }

        Ok(result)
    }
}

async fn sign_one(
    signer: Option<&dyn DocumentSigner>,
    batch: Batch,
    credentials: &SigningCredentials,
    timeout: Option<Duration>,
) -> Batch {
    let outcome = signing_outcome(signer, &batch, credentials, timeout).await;

    match &outcome {
        SigningOutcome::Signed(_) => {
            tracing::info!(batch_id = %batch.id(), "Batch signed");
        }
        SigningOutcome::Failed(reason) => {
            tracing::warn!(batch_id = %batch.id(), reason = %reason, "Batch signing failed");
        }
    }

    batch.with_signing_outcome(outcome)
}

async fn signing_outcome(
    signer: Option<&dyn DocumentSigner>,
    batch: &Batch,
    credentials: &SigningCredentials,
    timeout: Option<Duration>,
) -> SigningOutcome {
    let Some(document) = batch.document() else {
        return SigningOutcome::Failed("No document to sign".to_string());
    };
    let Some(signer) = signer else {
        return SigningOutcome::Failed("No document signer configured".to_string());
    };

    let signing = signer.sign(document, credentials);
    let signed = match timeout {
        Some(limit) => match tokio::time::timeout(limit, signing).await {
            Ok(signed) => signed,
            Err(_) => {
                return SigningOutcome::Failed(format!(
                    "Signing timed out after {}s",
                    limit.as_secs()
                ))
            }
        },
        None => signing.await,
    };

    match signed {
        Ok(signed) => SigningOutcome::Signed(signed),
        Err(e) => SigningOutcome::Failed(BatcherError::from(e).to_string()),
    }
}
