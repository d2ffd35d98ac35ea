//! Run catalog: the documents and chunks tables plus the dataset card.

pub mod card;
pub mod writer;

pub use card::{DatasetCard, CARD_FILE};
pub use writer::{read_jsonl, CatalogWriter, CommittedCatalog, CHUNKS_FILE, DOCUMENTS_FILE};

use crate::core::error::{MineError, Result};

/// Longest accepted dataset id
pub const MAX_DATASET_ID_LEN: usize = 64;

/// Dataset ids name a directory under the catalog root, so they are
/// restricted to `[A-Za-z0-9_.-]` and may not start with `.` (staging
/// and backup directories use that prefix).
pub fn validate_dataset_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(MineError::InvalidDatasetId(
            "dataset id cannot be empty".to_string(),
        ));
    }

    if id.len() > MAX_DATASET_ID_LEN {
        return Err(MineError::InvalidDatasetId(format!(
            "'{id}' is longer than {MAX_DATASET_ID_LEN} characters"
        )));
    }

    if id.starts_with('.') {
        return Err(MineError::InvalidDatasetId(format!(
            "'{id}' cannot start with '.'"
        )));
    }

    if let Some(c) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')))
    {
        return Err(MineError::InvalidDatasetId(format!(
            "'{id}' contains invalid character '{c}'"
        )));
    }

    Ok(())
}
