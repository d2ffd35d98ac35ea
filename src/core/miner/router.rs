//! Zone routing policy.
//!
//! Maps an aggregated risk vector to a destination zone plus the
//! dimensions that triggered it. Pure: no I/O, no state.

use serde::Serialize;

use crate::core::config::Thresholds;
use crate::core::types::{RiskDimension, RiskVector, Zone, NON_TEXT_REASON};

/// Outcome of routing one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingDecision {
    pub zone: Zone,
    /// Triggering dimensions, in declaration order
    pub reasons: Vec<RiskDimension>,
    /// Set when the document had no extractable text
    pub non_text: bool,
}

impl RoutingDecision {
    /// Decision for a document with no extractable text
    pub fn non_text() -> Self {
        Self {
            zone: Zone::Quarantined,
            reasons: Vec::new(),
            non_text: true,
        }
    }

    /// Reason tags as written to the catalog
    pub fn reason_tags(&self) -> Vec<String> {
        if self.non_text {
            return vec![NON_TEXT_REASON.to_string()];
        }
        self.reasons.iter().map(|d| d.as_str().to_string()).collect()
    }
}

/// Threshold-based router
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneRouter {
    thresholds: Thresholds,
}

impl ZoneRouter {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn route(&self, scores: &RiskVector) -> RoutingDecision {
        route(scores, &self.thresholds)
    }
}

/// A dimension triggers when its score is `>=` its threshold; the
/// zone is quarantined iff at least one dimension triggers.
pub fn route(scores: &RiskVector, thresholds: &Thresholds) -> RoutingDecision {
    let reasons: Vec<RiskDimension> = RiskDimension::ALL
        .into_iter()
        .filter(|dim| scores.get(*dim) >= thresholds.get(*dim))
        .collect();

    let zone = if reasons.is_empty() {
        Zone::Normalized
    } else {
        Zone::Quarantined
    };

    RoutingDecision {
        zone,
        reasons,
        non_text: false,
    }
}
