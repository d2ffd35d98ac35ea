//! Core data types for the docmine pipeline.
//!
//! Records written to the catalog, the risk vector shared by
//! scorers and the router, zone identifiers and run statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Reason tag attached to documents with no extractable text
pub const NON_TEXT_REASON: &str = "non-text";

/// Language tag used when no tagger can decide (BCP-47 "undetermined")
pub const UNDETERMINED_LANG: &str = "und";

/// Number of digest hex characters used for `doc_uid`
pub const DOC_UID_LEN: usize = 24;

/// One axis of the risk vector, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskDimension {
    Nsfw,
    Toxicity,
    Illicit,
    Pii,
}

impl RiskDimension {
    /// All dimensions in declaration order. Routing reasons follow
    /// this order.
    pub const ALL: [RiskDimension; 4] = [
        RiskDimension::Nsfw,
        RiskDimension::Toxicity,
        RiskDimension::Illicit,
        RiskDimension::Pii,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskDimension::Nsfw => "nsfw",
            RiskDimension::Toxicity => "toxicity",
            RiskDimension::Illicit => "illicit",
            RiskDimension::Pii => "pii",
        }
    }
}

impl fmt::Display for RiskDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-chunk (or aggregated per-document) risk scores.
///
/// Every value lies in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskVector {
    pub nsfw: f64,
    pub toxicity: f64,
    pub illicit: f64,
    pub pii: f64,
    pub confidence: f64,
}

impl RiskVector {
    /// Score on a single dimension
    pub fn get(&self, dim: RiskDimension) -> f64 {
        match dim {
            RiskDimension::Nsfw => self.nsfw,
            RiskDimension::Toxicity => self.toxicity,
            RiskDimension::Illicit => self.illicit,
            RiskDimension::Pii => self.pii,
        }
    }

    /// Copy with every value clamped into `[0.0, 1.0]` (NaN becomes 0.0)
    pub fn clamped(self) -> Self {
        fn unit(v: f64) -> f64 {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(0.0, 1.0)
            }
        }
        Self {
            nsfw: unit(self.nsfw),
            toxicity: unit(self.toxicity),
            illicit: unit(self.illicit),
            pii: unit(self.pii),
            confidence: unit(self.confidence),
        }
    }

    /// Document-level aggregation over chunk scores.
    ///
    /// Each risk dimension takes the maximum over all chunks, so one
    /// risky chunk flags the whole document. Confidence is the lowest
    /// chunk confidence. An empty input yields the zero vector.
    pub fn aggregate<'a, I>(scores: I) -> Self
    where
        I: IntoIterator<Item = &'a RiskVector>,
    {
        let mut iter = scores.into_iter();
        let first = match iter.next() {
            Some(v) => *v,
            None => return Self::default(),
        };

        iter.fold(first, |acc, v| Self {
            nsfw: acc.nsfw.max(v.nsfw),
            toxicity: acc.toxicity.max(v.toxicity),
            illicit: acc.illicit.max(v.illicit),
            pii: acc.pii.max(v.pii),
            confidence: acc.confidence.min(v.confidence),
        })
    }
}

/// Destination zone for a document and its chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    #[serde(rename = "silver_normalized")]
    Normalized,
    #[serde(rename = "red_quarantine")]
    Quarantined,
}

impl Zone {
    /// Directory name of the zone under the destination root
    pub fn dir_name(&self) -> &'static str {
        match self {
            Zone::Normalized => "silver_normalized",
            Zone::Quarantined => "red_quarantine",
        }
    }

    pub fn is_quarantined(&self) -> bool {
        matches!(self, Zone::Quarantined)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A contiguous span of normalized text produced by the chunker.
///
/// Offsets are character (not byte) positions into the normalized
/// text, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// One row of the documents table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub doc_uid: String,
    pub dataset_id: String,
    pub source_path: PathBuf,
    pub mime: String,
    pub bytes: u64,
    pub checksum: String,
    pub created_ts: Option<DateTime<Utc>>,
    pub modified_ts: Option<DateTime<Utc>>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub lang: String,
    /// Encoding the text was decoded with; `None` for non-text documents
    pub charset: Option<String>,
    pub chunk_count: usize,
    pub quarantine: bool,
    pub nsfw_score: f64,
    pub toxicity_score: f64,
    pub illicit_score: f64,
    pub pii_score: f64,
    pub risk_tags: Vec<String>,
}

impl DocumentRecord {
    /// Document scores as a risk vector (confidence not stored)
    pub fn scores(&self) -> RiskVector {
        RiskVector {
            nsfw: self.nsfw_score,
            toxicity: self.toxicity_score,
            illicit: self.illicit_score,
            pii: self.pii_score,
            confidence: 0.0,
        }
    }
}

/// One row of the chunks table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub doc_uid: String,
    pub chunk_id: String,
    pub idx: usize,
    pub offset_start: usize,
    pub offset_end: usize,
    pub lang: String,
    pub nsfw_score: f64,
    pub toxicity_score: f64,
    pub illicit_score: f64,
    pub pii_score: f64,
    pub text: String,
}

/// Build a chunk id from its document uid and ordinal
pub fn chunk_id(doc_uid: &str, idx: usize) -> String {
    format!("{doc_uid}:{idx}")
}

/// Derive a document uid from a content digest
pub fn doc_uid(digest: &str) -> String {
    digest.chars().take(DOC_UID_LEN).collect()
}

/// Statistics from a mining run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MiningReport {
    /// Dataset identifier
    pub dataset_id: String,

    /// Root directory that was walked
    pub source_root: PathBuf,

    /// Document records written
    pub documents: usize,

    /// Total size of the mined files
    pub bytes: u64,

    /// Chunk records written
    pub chunks: usize,

    /// Documents routed to the quarantined zone
    pub quarantined: usize,

    /// Documents routed to the normalized zone
    pub clean: usize,

    /// Files that could not be processed
    pub skipped_files: usize,

    /// Blobs newly written to the raw store
    pub blobs_written: usize,

    /// Files whose bytes were already in the raw store
    pub duplicate_blobs: usize,

    /// Run duration in milliseconds
    pub duration_ms: u64,

    /// Directory holding the committed catalog
    pub catalog_dir: PathBuf,
}
