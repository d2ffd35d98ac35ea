//! Error types and error handling for the docmine pipeline.
//!
//! Errors fall into three groups: startup errors (configuration,
//! input root, dataset id) that abort a run before any file is
//! touched, per-file errors that skip one file and let the run
//! continue, and catalog errors that abort the run without
//! replacing the previous catalog.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docmine operations
pub type Result<T> = std::result::Result<T, MineError>;

/// Main error type for the mining pipeline
#[derive(Error, Debug)]
pub enum MineError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid dataset id: {0}")]
    InvalidDatasetId(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to read {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Content store error: {0}")]
    StoreError(String),

    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),
}

impl MineError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Errors that only affect one input file. The run skips the
    /// file, counts it and keeps going.
    pub fn is_per_file(&self) -> bool {
        matches!(self, MineError::FileRead { .. } | MineError::StoreError(_))
    }

    /// Errors that must be surfaced before any file is processed
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            MineError::ConfigError(_)
                | MineError::InvalidPath(_)
                | MineError::InvalidDatasetId(_)
                | MineError::TomlError(_)
        )
    }
}
