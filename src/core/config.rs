//! Configuration management for docmine.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with defaults matching the reference
//! mining policy. Everything is validated before a run starts.

use crate::core::error::{MineError, Result};
use crate::core::types::RiskDimension;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub routing: Thresholds,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub mining: MiningConfig,
}

/// Chunking configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChunkingConfig {
    /// Minimum whitespace tokens before a chunk may be flushed
    #[serde(default = "default_tokens_min")]
    pub tokens_min: usize,

    /// Maximum whitespace tokens a buffer may grow to
    #[serde(default = "default_tokens_max")]
    pub tokens_max: usize,
}

/// Per-dimension quarantine thresholds. A dimension triggers when
/// its score is `>=` the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Thresholds {
    #[serde(default = "default_nsfw_threshold")]
    pub nsfw: f64,
    #[serde(default = "default_toxicity_threshold")]
    pub toxicity: f64,
    #[serde(default = "default_illicit_threshold")]
    pub illicit: f64,
    #[serde(default = "default_pii_threshold")]
    pub pii: f64,
}

impl Thresholds {
    pub fn get(&self, dim: RiskDimension) -> f64 {
        match dim {
            RiskDimension::Nsfw => self.nsfw,
            RiskDimension::Toxicity => self.toxicity,
            RiskDimension::Illicit => self.illicit,
            RiskDimension::Pii => self.pii,
        }
    }
}

/// Trigger sets for the pattern-based risk scorer
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RiskConfig {
    /// Words matched case-insensitively on word boundaries
    #[serde(default = "default_nsfw_terms")]
    pub nsfw_terms: Vec<String>,

    /// Words matched case-insensitively on word boundaries
    #[serde(default = "default_toxicity_terms")]
    pub toxicity_terms: Vec<String>,

    /// Literal phrases matched case-insensitively
    #[serde(default = "default_illicit_phrases")]
    pub illicit_phrases: Vec<String>,

    /// Regular expressions for personal identifiers
    #[serde(default = "default_pii_patterns")]
    pub pii_patterns: Vec<String>,

    /// Constant confidence reported by the pattern scorer
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

/// Text normalization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NormalizeConfig {
    /// Bytes inspected for charset detection and binary sniffing
    #[serde(default = "default_sniff_bytes")]
    pub sniff_bytes: usize,

    /// Extensions (lowercase, no dot) whose markup is stripped
    #[serde(default = "default_markup_extensions")]
    pub markup_extensions: Vec<String>,
}

/// Storage configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Destination root holding the raw store, both zones and the
    /// catalog. Unset means the XDG data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_root: Option<PathBuf>,
}

/// Run configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MiningConfig {
    /// Files processed concurrently
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Glob patterns skipped during discovery
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

// Default value functions
fn default_tokens_min() -> usize {
    120
}

fn default_tokens_max() -> usize {
    900
}

fn default_nsfw_threshold() -> f64 {
    0.55
}

fn default_toxicity_threshold() -> f64 {
    0.50
}

fn default_illicit_threshold() -> f64 {
    0.35
}

fn default_pii_threshold() -> f64 {
    0.60
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_nsfw_terms() -> Vec<String> {
    strings(&["nude", "porn", "xxx", "explicit", "nsfw", "sexual", "fetish"])
}

fn default_toxicity_terms() -> Vec<String> {
    strings(&["idiot", "stupid", "hate", "kill", "slur"])
}

fn default_illicit_phrases() -> Vec<String> {
    strings(&[
        "how to make a bomb",
        "credit card dump",
        "exploit kit",
        "c2 server",
    ])
}

fn default_pii_patterns() -> Vec<String> {
    // US social security number layout
    strings(&[r"\b\d{3}-\d{2}-\d{4}\b"])
}

fn default_confidence() -> f64 {
    0.5
}

fn default_sniff_bytes() -> usize {
    100_000
}

fn default_markup_extensions() -> Vec<String> {
    strings(&["html", "htm"])
}

fn default_workers() -> usize {
    1
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            tokens_min: default_tokens_min(),
            tokens_max: default_tokens_max(),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            nsfw: default_nsfw_threshold(),
            toxicity: default_toxicity_threshold(),
            illicit: default_illicit_threshold(),
            pii: default_pii_threshold(),
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            nsfw_terms: default_nsfw_terms(),
            toxicity_terms: default_toxicity_terms(),
            illicit_phrases: default_illicit_phrases(),
            pii_patterns: default_pii_patterns(),
            confidence: default_confidence(),
        }
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            sniff_bytes: default_sniff_bytes(),
            markup_extensions: default_markup_extensions(),
        }
    }
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| MineError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. DOCMINE_CONFIG env var
    /// 2. XDG config file (~/.config/docmine/config.toml)
    /// 3. ./docmine.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("DOCMINE_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("docmine.toml").exists() {
                Self::from_file("docmine.toml")?
            } else {
                Self::default()
            }
        };

        config
            .storage
            .data_root
            .get_or_insert_with(|| xdg.default_data_root());

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(root) = env::var("DOCMINE_DATA_ROOT") {
            self.storage.data_root = Some(PathBuf::from(root));
        }
        if let Ok(min) = env::var("DOCMINE_TOKENS_MIN") {
            if let Ok(n) = min.parse() {
                self.chunking.tokens_min = n;
            }
        }
        if let Ok(max) = env::var("DOCMINE_TOKENS_MAX") {
            if let Ok(n) = max.parse() {
                self.chunking.tokens_max = n;
            }
        }
        if let Ok(workers) = env::var("DOCMINE_WORKERS") {
            if let Ok(n) = workers.parse() {
                self.mining.workers = n;
            }
        }
    }

    /// Destination root: the configured path, else the XDG data directory
    pub fn data_root(&self) -> PathBuf {
        self.storage
            .data_root
            .clone()
            .unwrap_or_else(|| XdgDirs::new().default_data_root())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.chunking.tokens_max == 0 {
            return Err(MineError::ConfigError(
                "tokens_max must be non-zero".to_string(),
            ));
        }

        if self.chunking.tokens_min > self.chunking.tokens_max {
            return Err(MineError::ConfigError(format!(
                "tokens_min ({}) cannot exceed tokens_max ({})",
                self.chunking.tokens_min, self.chunking.tokens_max
            )));
        }

        for dim in RiskDimension::ALL {
            let t = self.routing.get(dim);
            if !t.is_finite() || !(0.0..=1.0).contains(&t) {
                return Err(MineError::ConfigError(format!(
                    "Threshold for {dim} must be within [0, 1], got {t}"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.risk.confidence) {
            return Err(MineError::ConfigError(format!(
                "Risk confidence must be within [0, 1], got {}",
                self.risk.confidence
            )));
        }

        if self.normalize.sniff_bytes == 0 {
            return Err(MineError::ConfigError(
                "sniff_bytes must be non-zero".to_string(),
            ));
        }

        if self.mining.workers == 0 {
            return Err(MineError::ConfigError(
                "workers must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!(
            "  Chunk tokens: min {} / max {}",
            self.chunking.tokens_min,
            self.chunking.tokens_max
        );
        tracing::info!(
            "  Thresholds: nsfw {} toxicity {} illicit {} pii {}",
            self.routing.nsfw,
            self.routing.toxicity,
            self.routing.illicit,
            self.routing.pii
        );
        tracing::info!("  Sniff bytes: {}", self.normalize.sniff_bytes);
        tracing::info!("  Data root: {:?}", self.data_root());
        tracing::info!("  Workers: {}", self.mining.workers);
    }
}
