//! Catalog accumulation and atomic publication.
//!
//! Records are held in memory for the whole run. `commit` writes the
//! documents table, the chunks table and the dataset card into a
//! staging directory next to the live catalog, then swaps it into
//! place with renames. A failed commit leaves the previous catalog
//! for the dataset untouched.

use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::catalog::card::{DatasetCard, CARD_FILE};
use crate::core::error::{MineError, Result};
use crate::core::types::{ChunkRecord, DocumentRecord};

pub const DOCUMENTS_FILE: &str = "documents.jsonl";
pub const CHUNKS_FILE: &str = "chunks.jsonl";

/// Paths and card of a committed catalog
#[derive(Debug, Clone)]
pub struct CommittedCatalog {
    pub dir: PathBuf,
    pub documents_path: PathBuf,
    pub chunks_path: PathBuf,
    pub card_path: PathBuf,
    pub card: DatasetCard,
}

/// In-memory catalog for one run of one dataset
#[derive(Debug)]
pub struct CatalogWriter {
    dataset_id: String,
    source_root: PathBuf,
    catalog_root: PathBuf,
    documents: Vec<DocumentRecord>,
    chunks: Vec<ChunkRecord>,
    chunked_uids: HashSet<String>,
    skipped_files: usize,
}

impl CatalogWriter {
    /// `catalog_root` is the parent of every dataset's catalog directory
    pub fn new(
        dataset_id: impl Into<String>,
        source_root: impl Into<PathBuf>,
        catalog_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            source_root: source_root.into(),
            catalog_root: catalog_root.into(),
            documents: Vec::new(),
            chunks: Vec::new(),
            chunked_uids: HashSet::new(),
            skipped_files: 0,
        }
    }

    /// Add one document and its chunks.
    ///
    /// Chunks are kept only for the first document carrying a given
    /// `doc_uid`; byte-identical files share one chunk sequence.
    /// Returns the number of chunk records added.
    pub fn add(&mut self, document: DocumentRecord, chunks: Vec<ChunkRecord>) -> usize {
        let added = if self.chunked_uids.insert(document.doc_uid.clone()) {
            let n = chunks.len();
            self.chunks.extend(chunks);
            n
        } else {
            0
        };
        self.documents.push(document);
        added
    }

    /// Count files that were discovered but could not be processed
    pub fn record_skipped(&mut self, count: usize) {
        self.skipped_files += count;
    }

    pub fn documents(&self) -> &[DocumentRecord] {
        &self.documents
    }

    pub fn chunks(&self) -> &[ChunkRecord] {
        &self.chunks
    }

    pub fn skipped_files(&self) -> usize {
        self.skipped_files
    }

    /// Final directory of this dataset's catalog
    pub fn target_dir(&self) -> PathBuf {
        self.catalog_root.join(&self.dataset_id)
    }

    /// Write all artifacts and atomically replace the previous catalog
    pub fn commit(self) -> Result<CommittedCatalog> {
        fs::create_dir_all(&self.catalog_root).map_err(|e| {
            MineError::CatalogError(format!(
                "Cannot create catalog root {:?}: {e}",
                self.catalog_root
            ))
        })?;

        restore_interrupted_swap(&self.target_dir())?;

        let staging = tempfile::Builder::new()
            .prefix(&format!(".{}.staging-", self.dataset_id))
            .tempdir_in(&self.catalog_root)
            .map_err(|e| MineError::CatalogError(format!("Cannot create staging dir: {e}")))?;

        let card = DatasetCard::build(
            &self.dataset_id,
            &self.source_root,
            &self.documents,
            self.chunks.len(),
            self.skipped_files,
            Utc::now(),
        );

        write_jsonl(&staging.path().join(DOCUMENTS_FILE), &self.documents)?;
        write_jsonl(&staging.path().join(CHUNKS_FILE), &self.chunks)?;
        write_file(&staging.path().join(CARD_FILE), card.to_toml()?.as_bytes())?;

        let target = self.target_dir();
        swap_into_place(staging.path(), &target)?;

        tracing::info!(
            "Committed catalog {:?}: {} documents, {} chunks",
            target,
            self.documents.len(),
            self.chunks.len()
        );

        Ok(CommittedCatalog {
            documents_path: target.join(DOCUMENTS_FILE),
            chunks_path: target.join(CHUNKS_FILE),
            card_path: target.join(CARD_FILE),
            dir: target,
            card,
        })
    }
}

/// Put back a catalog left only as a backup by a commit that died
/// between its two renames. A backup next to a live catalog is stale
/// and is removed.
fn restore_interrupted_swap(target: &Path) -> Result<()> {
    let backup = backup_path(target);
    if !backup.exists() {
        return Ok(());
    }

    if target.exists() {
        fs::remove_dir_all(&backup).map_err(|e| {
            MineError::CatalogError(format!("Cannot remove stale backup {backup:?}: {e}"))
        })?;
    } else {
        tracing::warn!(
            "Restoring catalog {:?} from interrupted commit backup {:?}",
            target,
            backup
        );
        fs::rename(&backup, target).map_err(|e| {
            MineError::CatalogError(format!("Cannot restore catalog from {backup:?}: {e}"))
        })?;
    }
    Ok(())
}

/// Replace `target` with `staged`, restoring the old `target` on failure
fn swap_into_place(staged: &Path, target: &Path) -> Result<()> {
    restore_interrupted_swap(target)?;
    let backup = backup_path(target);

    let had_previous = target.exists();
    if had_previous {
        fs::rename(target, &backup).map_err(|e| {
            MineError::CatalogError(format!("Cannot move aside previous catalog {target:?}: {e}"))
        })?;
    }

    if let Err(e) = fs::rename(staged, target) {
        if had_previous {
            if let Err(restore) = fs::rename(&backup, target) {
                tracing::error!(
                    "Failed to restore previous catalog from {:?}: {}",
                    backup,
                    restore
                );
            }
        }
        return Err(MineError::CatalogError(format!(
            "Cannot publish catalog {target:?}: {e}"
        )));
    }

    if had_previous {
        if let Err(e) = fs::remove_dir_all(&backup) {
            tracing::warn!("Failed to remove old catalog {:?}: {}", backup, e);
        }
    }

    Ok(())
}

fn backup_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.previous"))
}

fn write_jsonl<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let file = File::create(path).map_err(|e| catalog_io(path, e))?;
    let mut out = BufWriter::new(file);
    for row in rows {
        serde_json::to_writer(&mut out, row)?;
        out.write_all(b"\n").map_err(|e| catalog_io(path, e))?;
    }
    let file = out
        .into_inner()
        .map_err(|e| catalog_io(path, e.into_error()))?;
    file.sync_all().map_err(|e| catalog_io(path, e))
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| catalog_io(path, e))?;
    file.write_all(contents).map_err(|e| catalog_io(path, e))?;
    file.sync_all().map_err(|e| catalog_io(path, e))
}

fn catalog_io(path: &Path, e: std::io::Error) -> MineError {
    MineError::CatalogError(format!("Failed to write {path:?}: {e}"))
}

/// Read back a JSON Lines table
pub fn read_jsonl<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| MineError::CatalogError(format!("Cannot read {path:?}: {e}")))?;
    contents
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).map_err(MineError::from))
        .collect()
}
