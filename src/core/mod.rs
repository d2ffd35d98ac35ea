//! Core domain logic (adapter-agnostic)
//!
//! This module contains all mining logic that is independent of the
//! command-line front end.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Catalog records, risk vectors, zones
//! - **xdg**: XDG directory handling
//! - **store**: Content-addressed blob store and zone layout
//! - **miner**: Walking, normalization, chunking, scoring, routing
//! - **catalog**: Catalog tables and dataset card
//! - **services**: Unified service container

pub mod catalog;
pub mod config;
pub mod error;
pub mod miner;
pub mod services;
pub mod store;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{MineError, Result};
pub use services::Services;
