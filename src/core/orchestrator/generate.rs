//! Batch generation

use super::summary::{GenerationError, GenerationErrorKind, GenerationResult};
use super::window::run_windowed;
use super::BatchOrchestrator;
use crate::adapters::{RecordFilters, RecordSource};
use crate::core::document::{build_group_document, next_lote_number, DocumentOptions};
use crate::core::grouping::{group_records, BillingGroup, GroupKey};
use crate::domain::batch::Batch;
use crate::domain::billing::InsurerInfo;
use crate::domain::errors::BatcherError;
use crate::domain::ids::{OrganizationId, RecordId};
use crate::domain::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything a group task needs, cloned into each task
#[derive(Clone)]
struct GroupContext {
    source: Arc<dyn RecordSource>,
    organization_id: OrganizationId,
    max_guides: usize,
    schema_version: String,
}

/// What one group task produced
#[derive(Debug, Default)]
struct GroupOutcome {
    batches: Vec<Batch>,
    errors: Vec<GenerationError>,
}

impl GroupOutcome {
    fn failed(error: GenerationError) -> Self {
        Self {
            batches: Vec::new(),
            errors: vec![error],
        }
    }
}

impl BatchOrchestrator {
    /// Generates batches for an organization's validated records
    ///
    /// Records without an insurer are skipped. Each (insurer, period) group is
    /// split into chunks of at most `max_guides_per_batch` guides and every
    /// chunk becomes one pending [`Batch`]. A group that fails (unknown
    /// insurer, lookup error, build error, timeout, panic) is reported in
    /// [`GenerationResult::errors`] and never affects other groups.
    ///
    /// Batch order in the result follows group order, then chunk order.
    ///
    /// # Errors
    ///
    /// Returns an error only if the initial record or line-item fetch fails.
    #[tracing::instrument(skip_all, fields(organization_id = %organization_id))]
    pub async fn generate_batches(
        &self,
        organization_id: &OrganizationId,
        filters: &RecordFilters,
    ) -> Result<GenerationResult> {
        let started = Instant::now();

        let records = self.source.fetch_records(organization_id, filters).await?;
        if records.is_empty() {
            tracing::info!("No records to batch");
            return Ok(GenerationResult::new());
        }

        let record_ids: Vec<RecordId> = records.iter().map(|r| r.id.clone()).collect();
        let line_items = self.source.fetch_line_items(&record_ids).await?;

        let groups = group_records(records, &line_items);
        tracing::info!(
            records = record_ids.len(),
            groups = groups.len(),
            max_guides_per_batch = self.config.max_guides_per_batch,
            concurrency = self.config.concurrency,
            "Generating batches"
        );

        let keys: Vec<GroupKey> = groups.iter().map(|g| g.key.clone()).collect();
        let context = GroupContext {
            source: self.source.clone(),
            organization_id: organization_id.clone(),
            max_guides: self.config.max_guides_per_batch,
            schema_version: self.schema_version.clone(),
        };
        let timeout = self.task_timeout();

        let outcomes = run_windowed("generate", groups, self.config.concurrency, |group| {
            let context = context.clone();
            async move { process_group_with_timeout(context, group, timeout).await }
        })
        .await;

        let mut result = GenerationResult::new();
        for (key, outcome) in keys.into_iter().zip(outcomes) {
            match outcome {
                Ok(outcome) => {
                    for batch in outcome.batches {
                        result.add_batch(batch);
                    }
                    for error in outcome.errors {
                        result.add_error(error);
                    }
                }
                Err(join_error) => {
                    crate::log_error_with_context!(&join_error, "Group task aborted");
                    result.add_error(GenerationError::new(
                        GenerationErrorKind::Panicked,
                        Some(key.clone()),
                        format!("Group {key} task failed: {join_error}"),
                    ));
                }
            }
        }

        tracing::debug!(
            duration_ms = started.elapsed().as_millis() as u64,
            "Generation finished"
        );
        result.log_summary();
        Ok(result)
    }
}

async fn process_group_with_timeout(
    context: GroupContext,
    group: BillingGroup,
    timeout: Option<Duration>,
) -> GroupOutcome {
    let Some(limit) = timeout else {
        return process_group(context, group).await;
    };

    let key = group.key.clone();
    match tokio::time::timeout(limit, process_group(context, group)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::warn!(group = %key, timeout_secs = limit.as_secs(), "Group task timed out");
            let message = format!("Timed out after {}s processing group {key}", limit.as_secs());
            GroupOutcome::failed(GenerationError::new(
                GenerationErrorKind::Timeout,
                Some(key),
                message,
            ))
        }
    }
}

/// Resolves the insurer, then builds one batch per chunk of the group
async fn process_group(context: GroupContext, group: BillingGroup) -> GroupOutcome {
    let key = group.key.clone();

    let insurer = match context.source.fetch_insurer(&key.insurer_id).await {
        Ok(Some(insurer)) => insurer,
        Ok(None) => {
            let error = BatcherError::InsurerNotFound(key.insurer_id.to_string());
            tracing::warn!(group = %key, error = %error, "Insurer not found");
            return GroupOutcome::failed(GenerationError::new(
                GenerationErrorKind::InsurerNotFound,
                Some(key),
                error.to_string(),
            ));
        }
        Err(e) => {
            crate::log_error_with_context!(&e, "Insurer lookup failed");
            let message = format!("Failed to fetch insurer {}: {e}", key.insurer_id);
            return GroupOutcome::failed(GenerationError::new(
                GenerationErrorKind::Source,
                Some(key),
                message,
            ));
        }
    };

    let mut outcome = GroupOutcome::default();
    let chunks = group.split(context.max_guides);
    let chunk_count = chunks.len();

    for (index, chunk) in chunks.into_iter().enumerate() {
        match build_batch(&context, &insurer, &chunk) {
            Ok(batch) => {
                tracing::info!(
                    batch_id = %batch.id(),
                    insurer_id = %key.insurer_id,
                    period = %key.period,
                    lote_number = batch.lote_number(),
                    chunk = index + 1,
                    chunks = chunk_count,
                    guides = batch.guide_count(),
                    total_amount = %batch.total_amount(),
                    "Batch created"
                );
                outcome.batches.push(batch);
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Batch build failed");
                outcome.errors.push(GenerationError::new(
                    GenerationErrorKind::Build,
                    Some(key.clone()),
                    format!("Failed to build batch {} of group {key}: {e}", index + 1),
                ));
            }
        }
    }

    outcome
}

fn build_batch(context: &GroupContext, insurer: &InsurerInfo, chunk: &BillingGroup) -> Result<Batch> {
    let lote_number = next_lote_number();
    let options = DocumentOptions::new(lote_number.as_str(), insurer.ans_code.as_str())
        .with_schema_version(context.schema_version.as_str());
    let document = build_group_document(chunk, &options)?;

    Batch::builder()
        .organization_id(context.organization_id.clone())
        .insurer(
            chunk.key.insurer_id.clone(),
            insurer.name.as_str(),
            insurer.ans_code.as_str(),
        )
        .period(chunk.key.period.clone())
        .lote_number(lote_number)
        .guide_count(chunk.guide_count())
        .total_amount(chunk.total_amount())
        .document(document)
        .build()
}
