//! Generate command implementation
//!
//! Runs batch generation against the JSON record source and writes one XML
//! file per batch plus a `manifest.json` into the output directory.

use crate::adapters::json::JsonRecordSource;
use crate::adapters::RecordFilters;
use crate::config::{load_config, BatcherConfig};
use crate::core::document::format_money;
use crate::core::orchestrator::{BatchOrchestrator, GenerationError, GenerationResult};
use crate::domain::batch::{Batch, BatchStatus};
use crate::domain::ids::{BillingPeriod, InsurerId, OrganizationId};
use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Manifest file name written next to the batch documents
pub const MANIFEST_FILE: &str = "manifest.json";

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Organization whose records are batched
    #[arg(long)]
    pub org: String,

    /// Only batch records of this insurer
    #[arg(long)]
    pub insurer: Option<String>,

    /// Only batch records of this billing period
    #[arg(long, value_name = "YYYY-MM")]
    pub period: Option<String>,

    /// Override the output directory
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override the dataset file of the record source
    #[arg(long)]
    pub source: Option<String>,

    /// Override the maximum number of guides per batch
    #[arg(long)]
    pub max_guides: Option<usize>,

    /// Override the number of groups processed concurrently
    #[arg(long)]
    pub concurrency: Option<usize>,
}

/// One batch as listed in the manifest
#[derive(Debug, Serialize)]
pub struct ManifestEntry {
    pub id: String,
    pub insurer_id: String,
    pub insurer_name: String,
    pub insurer_ans_code: String,
    pub period: String,
    pub lote_number: String,
    pub guide_count: usize,
    pub total_amount: Decimal,
    pub status: BatchStatus,
    pub file: Option<String>,
}

/// Summary of a generate run written as `manifest.json`
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub generated_at: DateTime<Utc>,
    pub organization_id: String,
    pub success: bool,
    pub total_guides: usize,
    pub total_amount: Decimal,
    pub batches: Vec<ManifestEntry>,
    pub errors: Vec<GenerationError>,
}

impl GenerateArgs {
    /// Execute the generate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(organization_id = %self.org, "Starting generate command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if let Err(e) = self.apply_overrides(&mut config) {
            eprintln!("Invalid arguments: {e}");
            return Ok(2);
        }

        let (organization_id, filters) = match self.parse_scope() {
            Ok(scope) => scope,
            Err(e) => {
                eprintln!("Invalid arguments: {e}");
                return Ok(2);
            }
        };

        let Some(source_path) = config.source.path.clone() else {
            eprintln!("No record source configured. Set [source] path or pass --source");
            return Ok(2);
        };

        let source = match JsonRecordSource::from_path(&source_path).await {
            Ok(source) => source,
            Err(e) => {
                tracing::error!(error = %e, "Failed to open record source");
                eprintln!("Failed to open record source: {e}");
                return Ok(5);
            }
        };

        let orchestrator = BatchOrchestrator::new(Arc::new(source))
            .with_config(config.batching.clone())
            .with_schema_version(config.document.schema_version.clone());

        println!("🚀 Generating batches for {organization_id}...");
        println!();

        let result = match orchestrator.generate_batches(&organization_id, &filters).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Batch generation failed");
                eprintln!("Batch generation failed: {e}");
                return Ok(5);
            }
        };

        let output_dir = PathBuf::from(&config.output.directory);
        let manifest_path = write_outputs(&output_dir, &organization_id, &result)?;

        print_results(&result);
        println!();
        println!("📄 Manifest written to {}", manifest_path.display());

        if result.is_successful() {
            Ok(0)
        } else {
            Ok(1)
        }
    }

    fn apply_overrides(&self, config: &mut BatcherConfig) -> Result<(), String> {
        if let Some(max_guides) = self.max_guides {
            tracing::info!(max_guides, "Overriding max guides per batch from CLI");
            config.batching.max_guides_per_batch = max_guides;
        }
        if let Some(concurrency) = self.concurrency {
            tracing::info!(concurrency, "Overriding concurrency from CLI");
            config.batching.concurrency = concurrency;
        }
        if let Some(output) = &self.output {
            config.output.directory = output.clone();
        }
        if let Some(source) = &self.source {
            config.source.path = Some(source.clone());
        }
        config.validate()
    }

    fn parse_scope(&self) -> Result<(OrganizationId, RecordFilters), String> {
        let organization_id = OrganizationId::new(self.org.as_str())?;

        let mut filters = RecordFilters::none();
        if let Some(insurer) = &self.insurer {
            filters = filters.with_insurer(InsurerId::new(insurer.as_str())?);
        }
        if let Some(period) = &self.period {
            filters = filters.with_period(BillingPeriod::new(period.as_str())?);
        }

        Ok((organization_id, filters))
    }
}

/// Writes `<batch-id>.xml` for every batch with a document, then the manifest
///
/// Returns the manifest path.
pub fn write_outputs(
    dir: &Path,
    organization_id: &OrganizationId,
    result: &GenerationResult,
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut entries = Vec::with_capacity(result.batches.len());
    for batch in &result.batches {
        let file = match batch.signed_document().or(batch.document()) {
            Some(document) => {
                let name = format!("{}.xml", batch.id());
                let path = dir.join(&name);
                fs::write(&path, document)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                tracing::debug!(batch_id = %batch.id(), path = %path.display(), "Batch written");
                Some(name)
            }
            None => None,
        };
        entries.push(manifest_entry(batch, file));
    }

    let manifest = Manifest {
        generated_at: Utc::now(),
        organization_id: organization_id.to_string(),
        success: result.is_successful(),
        total_guides: result.total_guides,
        total_amount: result.total_amount,
        batches: entries,
        errors: result.errors.clone(),
    };

    let manifest_path = dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(&manifest_path, json)
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

    Ok(manifest_path)
}

fn manifest_entry(batch: &Batch, file: Option<String>) -> ManifestEntry {
    ManifestEntry {
        id: batch.id().to_string(),
        insurer_id: batch.insurer_id().to_string(),
        insurer_name: batch.insurer_name().to_string(),
        insurer_ans_code: batch.insurer_ans_code().to_string(),
        period: batch.period().to_string(),
        lote_number: batch.lote_number().to_string(),
        guide_count: batch.guide_count(),
        total_amount: batch.total_amount(),
        status: batch.status(),
        file,
    }
}

fn print_results(result: &GenerationResult) {
    if result.batches.is_empty() {
        println!("No batches generated.");
    } else {
        println!(
            "{:<40} {:<16} {:<8} {:>6} {:>14} {:<8}",
            "BATCH", "INSURER", "PERIOD", "GUIDES", "AMOUNT", "STATUS"
        );
        for batch in &result.batches {
            println!(
                "{:<40} {:<16} {:<8} {:>6} {:>14} {:<8}",
                batch.id().as_str(),
                batch.insurer_id().as_str(),
                batch.period().as_str(),
                batch.guide_count(),
                format_money(batch.total_amount()),
                batch.status().as_str()
            );
        }
    }

    println!();
    println!("📊 Generation Summary");
    println!("  Batches: {}", result.batches.len());
    println!("  Guides: {}", result.total_guides);
    println!("  Total amount: {}", format_money(result.total_amount));

    if result.is_successful() {
        println!();
        println!("✅ All groups processed successfully");
    } else {
        println!();
        println!("⚠️  {} group(s) failed:", result.errors.len());
        for message in result.error_messages() {
            println!("  - {message}");
        }
    }
}
