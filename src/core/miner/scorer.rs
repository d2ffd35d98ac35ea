//! Pluggable safety scoring and language tagging.
//!
//! Callers depend only on [`RiskScorer::score`] returning a
//! [`RiskVector`] with values in `[0, 1]`. The default
//! [`PatternScorer`] fires a dimension to 1.0 when any of its
//! configured triggers matches; a learned classifier can replace it
//! behind the same trait.

use regex::Regex;

use crate::core::config::RiskConfig;
use crate::core::error::{MineError, Result};
use crate::core::types::{RiskVector, UNDETERMINED_LANG};

/// Produces a risk vector for a span of text
pub trait RiskScorer: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Score one chunk of text. Implementations must return values in `[0, 1]`.
    fn score(&self, text: &str) -> RiskVector;
}

/// Assigns a language tag to a span of text
pub trait LanguageTagger: Send + Sync {
    fn tag(&self, text: &str) -> String;
}

/// Tagger used when no language identification is wired in
#[derive(Debug, Clone, Copy, Default)]
pub struct UndeterminedTagger;

impl LanguageTagger for UndeterminedTagger {
    fn tag(&self, _text: &str) -> String {
        UNDETERMINED_LANG.to_string()
    }
}

/// Scorer that never flags anything (confidence 0)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopScorer;

impl RiskScorer for NoopScorer {
    fn name(&self) -> &str {
        "noop"
    }

    fn score(&self, _text: &str) -> RiskVector {
        RiskVector::default()
    }
}

/// Trigger-based scorer built from configuration
#[derive(Debug, Clone)]
pub struct PatternScorer {
    nsfw: Option<Regex>,
    toxicity: Option<Regex>,
    illicit: Option<Regex>,
    pii: Vec<Regex>,
    confidence: f64,
}

impl PatternScorer {
    /// Compile the trigger sets.
    ///
    /// Vocabulary and phrases are matched literally, case-insensitive,
    /// on word boundaries. PII entries are regular expressions.
    pub fn from_config(config: &RiskConfig) -> Result<Self> {
        let pii = config
            .pii_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| {
                    MineError::ConfigError(format!("Invalid pii pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            nsfw: word_alternation("nsfw", &config.nsfw_terms)?,
            toxicity: word_alternation("toxicity", &config.toxicity_terms)?,
            illicit: word_alternation("illicit", &config.illicit_phrases)?,
            pii,
            confidence: config.confidence.clamp(0.0, 1.0),
        })
    }

    fn fires(re: &Option<Regex>, text: &str) -> f64 {
        match re {
            Some(re) if re.is_match(text) => 1.0,
            _ => 0.0,
        }
    }
}

/// `\b` only binds to word characters, so it is placed on a term's
/// edge only when that edge is one; `c++` still matches before a space.
fn bounded_term(term: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let lead = if term.starts_with(is_word) { r"\b" } else { "" };
    let trail = if term.ends_with(is_word) { r"\b" } else { "" };
    format!("{lead}{}{trail}", regex::escape(term))
}

fn word_alternation(name: &str, terms: &[String]) -> Result<Option<Regex>> {
    let bounded: Vec<String> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(bounded_term)
        .collect();

    if bounded.is_empty() {
        return Ok(None);
    }

    let pattern = format!("(?i)(?:{})", bounded.join("|"));
    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| MineError::ConfigError(format!("Invalid {name} trigger set: {e}")))
}

impl Default for PatternScorer {
    fn default() -> Self {
        // The built-in vocabularies are plain words and always compile
        Self::from_config(&RiskConfig::default()).unwrap()
    }
}

impl RiskScorer for PatternScorer {
    fn name(&self) -> &str {
        "pattern"
    }

    fn score(&self, text: &str) -> RiskVector {
        RiskVector {
            nsfw: Self::fires(&self.nsfw, text),
            toxicity: Self::fires(&self.toxicity, text),
            illicit: Self::fires(&self.illicit, text),
            pii: if self.pii.iter().any(|re| re.is_match(text)) {
                1.0
            } else {
                0.0
            },
            confidence: self.confidence,
        }
    }
}
