//! Document mining module.
//!
//! Everything between discovering a file and producing its catalog
//! records:
//!
//! - File system walking with exclude patterns
//! - Charset-aware text extraction and Unicode normalization
//! - Paragraph-greedy, token-bounded chunking with character offsets
//! - Pluggable risk scoring and language tagging
//! - Threshold-based zone routing
//! - Pipeline orchestration (sequential or on a worker pool)
//!
//! Chunking, scoring and routing are pure and need no file system;
//! only the walker and the pipeline touch disk.

pub mod chunker;
pub mod normalizer;
pub mod pipeline;
pub mod router;
pub mod scorer;
pub mod walker;

pub use chunker::Chunker;
pub use normalizer::{NormalizedText, TextNormalizer};
pub use pipeline::MiningPipeline;
pub use router::{route, RoutingDecision, ZoneRouter};
pub use scorer::{LanguageTagger, NoopScorer, PatternScorer, RiskScorer, UndeterminedTagger};
pub use walker::{Discovery, FileWalker};
