//! docmine - document mining pipeline
//!
//! Walks an arbitrary directory tree and turns it into a reviewable
//! text dataset: raw bytes are stored once by SHA-256 digest, text is
//! extracted and normalized, split into token-bounded chunks, scored
//! for safety risk and routed to a normalized or a quarantine zone.
//! Each run ends with a documents table, a chunks table and a dataset
//! card committed atomically under `catalog/<dataset_id>/`.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - store (blob store, destination layout)
//!   - miner (walker, normalizer, chunker, scorer, router, pipeline)
//!   - catalog (tables, dataset card)
//!   - services (unified service container)
//!
//! - **cli**: Command-line adapter (depends on core)

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::catalog::{CatalogWriter, DatasetCard};
pub use core::config::Config;
pub use core::error::{MineError, Result};
pub use core::miner::{MiningPipeline, PatternScorer, RiskScorer, ZoneRouter};
pub use core::services::Services;
pub use core::store::ContentStore;
pub use core::types::*;
