//! Content-addressed blob storage.
//!
//! Blobs are keyed by the SHA-256 of their raw bytes and laid out
//! as `<root>/<xx>/<digest>` where `xx` is the first two hex
//! characters. A blob is written at most once: the first writer
//! publishes it, every later `put` of the same bytes is a no-op.

use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::core::error::{MineError, Result};

/// Outcome of storing one blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRecord {
    /// Lowercase hex SHA-256 of the content
    pub digest: String,

    /// Content size in bytes
    pub size: u64,

    /// Location of the stored blob
    pub path: PathBuf,

    /// False when the blob already existed
    pub newly_written: bool,
}

impl BlobRecord {
    pub fn shard(&self) -> &str {
        shard_prefix(&self.digest)
    }
}

/// Hex SHA-256 digest of raw bytes
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// First two hex characters of a digest, used for directory fan-out
pub fn shard_prefix(digest: &str) -> &str {
    digest.get(..2).unwrap_or(digest)
}

/// Content-addressed raw blob store
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            MineError::StoreError(format!("Failed to create blob store {root:?}: {e}"))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Storage location for a digest
    pub fn blob_path(&self, digest: &str) -> PathBuf {
        self.root.join(shard_prefix(digest)).join(digest)
    }

    pub fn contains(&self, digest: &str) -> bool {
        self.blob_path(digest).is_file()
    }

    /// Store raw bytes and return their record
    pub fn put(&self, bytes: &[u8]) -> Result<BlobRecord> {
        self.put_inner(bytes, None)
    }

    /// Store the bytes read from `source`, carrying over its
    /// permissions and timestamps where the platform allows.
    ///
    /// The bytes passed in are the ones hashed and stored, so a source
    /// file that changes after it was read cannot desync blob and digest.
    pub fn put_file(&self, source: &Path, bytes: &[u8]) -> Result<BlobRecord> {
        let metadata = fs::metadata(source).ok();
        self.put_inner(bytes, metadata.as_ref())
    }

    fn put_inner(&self, bytes: &[u8], source_meta: Option<&fs::Metadata>) -> Result<BlobRecord> {
        let digest = sha256_hex(bytes);
        let path = self.blob_path(&digest);

        let newly_written = if path.exists() {
            false
        } else {
            self.publish(&path, bytes, source_meta)?
        };

        if newly_written {
            tracing::debug!("Stored blob {} ({} bytes)", digest, bytes.len());
        } else {
            tracing::debug!("Blob {} already present", digest);
        }

        Ok(BlobRecord {
            digest,
            size: bytes.len() as u64,
            path,
            newly_written,
        })
    }

    /// Stage the bytes next to the destination and link them into
    /// place without clobbering. Losing a race to another writer of
    /// the same digest is reported as `Ok(false)`.
    fn publish(&self, dest: &Path, bytes: &[u8], source_meta: Option<&fs::Metadata>) -> Result<bool> {
        let store_err = |e: io::Error| MineError::StoreError(format!("{dest:?}: {e}"));

        let shard_dir = dest
            .parent()
            .ok_or_else(|| MineError::StoreError(format!("Blob path has no parent: {dest:?}")))?;
        fs::create_dir_all(shard_dir).map_err(store_err)?;

        let mut staged = NamedTempFile::new_in(shard_dir).map_err(store_err)?;
        staged.write_all(bytes).map_err(store_err)?;
        staged.as_file().sync_all().map_err(store_err)?;

        if let Some(meta) = source_meta {
            preserve_metadata(staged.as_file(), meta);
        }

        match staged.persist_noclobber(dest) {
            Ok(_) => Ok(true),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(store_err(e.error)),
        }
    }

    /// Number of blobs currently stored
    pub fn blob_count(&self) -> usize {
        walkdir::WalkDir::new(&self.root)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| !e.file_name().to_string_lossy().starts_with(".tmp"))
            .count()
    }
}

fn preserve_metadata(file: &fs::File, meta: &fs::Metadata) {
    if let Err(e) = file.set_permissions(meta.permissions()) {
        tracing::debug!("Could not copy permissions: {}", e);
    }

    let mut times = fs::FileTimes::new();
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Err(e) = file.set_times(times) {
        tracing::debug!("Could not copy timestamps: {}", e);
    }
}
