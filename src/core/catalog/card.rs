//! Dataset card: the human-reviewable summary of one mining run.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::core::error::{MineError, Result};
use crate::core::types::DocumentRecord;

/// File name of the card inside a dataset's catalog directory
pub const CARD_FILE: &str = "dataset_card.toml";

const SCOPE: &str = "personal+work_mixed";
const LICENSE_SUMMARY: &str = "mixed/unknown (default restricted)";
const PROVENANCE_NOTES: &str = "auto-mined; manual review advised";
const INTENDED_USE: [&str; 3] = ["discovery", "filter_training", "research"];
const RETENTION_DAYS: i64 = 365;

/// Routing statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingSummary {
    pub quarantine_docs: usize,
    pub clean_docs: usize,
    pub skipped_files: usize,
}

/// Record and blob totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub documents: usize,
    pub chunks: usize,
    /// Distinct content digests referenced by the documents
    pub blobs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retention {
    pub review_by: NaiveDate,
}

/// Dataset card written next to the catalog tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetCard {
    pub id: String,
    pub source: String,
    pub scope: String,
    pub license_summary: String,
    /// "present-high" when any document scored on pii, else "unknown"
    pub pii: String,
    pub nsfw: String,
    pub toxic: String,
    pub provenance_notes: String,
    pub generated_at: DateTime<Utc>,
    pub intended_use: Vec<String>,
    pub routing: RoutingSummary,
    pub totals: Totals,
    pub retention: Retention,
}

impl DatasetCard {
    /// Summarize a run's records
    pub fn build(
        dataset_id: &str,
        source_root: &Path,
        documents: &[DocumentRecord],
        chunk_count: usize,
        skipped_files: usize,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let any = |f: fn(&DocumentRecord) -> f64| documents.iter().any(|d| f(d) > 0.0);
        let quarantine_docs = documents.iter().filter(|d| d.quarantine).count();
        let blobs = documents
            .iter()
            .map(|d| d.checksum.as_str())
            .collect::<HashSet<_>>()
            .len();

        Self {
            id: dataset_id.to_string(),
            source: source_root.display().to_string(),
            scope: SCOPE.to_string(),
            license_summary: LICENSE_SUMMARY.to_string(),
            pii: presence(any(|d| d.pii_score), "present-high"),
            nsfw: presence(any(|d| d.nsfw_score), "present"),
            toxic: presence(any(|d| d.toxicity_score), "present"),
            provenance_notes: PROVENANCE_NOTES.to_string(),
            generated_at,
            intended_use: INTENDED_USE.iter().map(|s| s.to_string()).collect(),
            routing: RoutingSummary {
                quarantine_docs,
                clean_docs: documents.len() - quarantine_docs,
                skipped_files,
            },
            totals: Totals {
                documents: documents.len(),
                chunks: chunk_count,
                blobs,
            },
            retention: Retention {
                review_by: (generated_at + Duration::days(RETENTION_DAYS)).date_naive(),
            },
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Read a card from disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            MineError::CatalogError(format!("Cannot read dataset card {path:?}: {e}"))
        })?;
        Ok(toml::from_str(&contents)?)
    }
}

fn presence(found: bool, label: &str) -> String {
    if found {
        label.to_string()
    } else {
        "unknown".to_string()
    }
}
