//! Unified service container for docmine
//!
//! Holds the configuration and the pluggable scoring policies shared
//! by every command.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::miner::{
    LanguageTagger, MiningPipeline, PatternScorer, RiskScorer, UndeterminedTagger,
};
use crate::core::store::ZoneLayout;
use std::fmt;
use std::sync::Arc;

/// Unified services container
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,

    /// Risk scoring policy
    pub scorer: Arc<dyn RiskScorer>,

    /// Language tagging policy
    pub tagger: Arc<dyn LanguageTagger>,
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("config", &self.config)
            .field("scorer", &self.scorer.name())
            .finish_non_exhaustive()
    }
}

impl Services {
    /// Create services from configuration, compiling the default
    /// pattern scorer from the `[risk]` trigger sets
    pub fn new(config: Config) -> Result<Self> {
        let scorer = Arc::new(PatternScorer::from_config(&config.risk)?);
        Ok(Self::with_policies(
            config,
            scorer,
            Arc::new(UndeterminedTagger),
        ))
    }

    /// Create services with caller-supplied scoring policies
    pub fn with_policies(
        config: Config,
        scorer: Arc<dyn RiskScorer>,
        tagger: Arc<dyn LanguageTagger>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            scorer,
            tagger,
        }
    }

    /// Destination layout for the configured data root
    pub fn layout(&self) -> ZoneLayout {
        ZoneLayout::new(self.config.data_root())
    }

    /// Create a MiningPipeline from the shared configuration
    pub fn create_pipeline(&self) -> Result<MiningPipeline> {
        self.create_pipeline_with(&self.config)
    }

    /// Create a MiningPipeline with per-run configuration overrides
    pub fn create_pipeline_with(&self, config: &Config) -> Result<MiningPipeline> {
        MiningPipeline::new(config, Arc::clone(&self.scorer), Arc::clone(&self.tagger))
    }
}
