//! Destination tree layout.
//!
//! ```text
//! <root>/
//!   bronze_raw/<xx>/<digest>
//!   silver_normalized/docs/<xx>/<digest>.txt
//!   silver_normalized/chunks/<xx>/<doc_uid>_<idx>.txt
//!   red_quarantine/{docs,chunks}/...
//!   catalog/<dataset_id>/
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{MineError, Result};
use crate::core::store::content::shard_prefix;
use crate::core::types::Zone;

/// Paths under a destination root
#[derive(Debug, Clone)]
pub struct ZoneLayout {
    root: PathBuf,
}

impl ZoneLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Raw blob store
    pub fn bronze_dir(&self) -> PathBuf {
        self.root.join("bronze_raw")
    }

    pub fn zone_dir(&self, zone: Zone) -> PathBuf {
        self.root.join(zone.dir_name())
    }

    pub fn catalog_dir(&self) -> PathBuf {
        self.root.join("catalog")
    }

    /// Directory holding one dataset's committed catalog
    pub fn dataset_catalog_dir(&self, dataset_id: &str) -> PathBuf {
        self.catalog_dir().join(dataset_id)
    }

    /// Create the four top-level areas
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [
            self.bronze_dir(),
            self.zone_dir(Zone::Normalized),
            self.zone_dir(Zone::Quarantined),
            self.catalog_dir(),
        ] {
            fs::create_dir_all(&dir).map_err(|e| {
                MineError::InvalidPath(format!("Cannot create destination {dir:?}: {e}"))
            })?;
        }
        Ok(())
    }

    pub fn document_text_path(&self, zone: Zone, digest: &str) -> PathBuf {
        self.zone_dir(zone)
            .join("docs")
            .join(shard_prefix(digest))
            .join(format!("{digest}.txt"))
    }

    pub fn chunk_text_path(&self, zone: Zone, digest: &str, doc_uid: &str, idx: usize) -> PathBuf {
        self.zone_dir(zone)
            .join("chunks")
            .join(shard_prefix(digest))
            .join(format!("{doc_uid}_{idx}.txt"))
    }

    /// Write a document's normalized text under its zone
    pub fn write_document_text(&self, zone: Zone, digest: &str, text: &str) -> Result<PathBuf> {
        let path = self.document_text_path(zone, digest);
        write_text(&path, text)?;
        Ok(path)
    }

    /// Write one chunk's text under its zone
    pub fn write_chunk_text(
        &self,
        zone: Zone,
        digest: &str,
        doc_uid: &str,
        idx: usize,
        text: &str,
    ) -> Result<PathBuf> {
        let path = self.chunk_text_path(zone, digest, doc_uid, idx);
        write_text(&path, text)?;
        Ok(path)
    }
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| MineError::StoreError(format!("{parent:?}: {e}")))?;
    }
    fs::write(path, text).map_err(|e| MineError::StoreError(format!("{path:?}: {e}")))
}
