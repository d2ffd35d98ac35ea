//! Config command - show current configuration

use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also print the risk trigger vocabularies
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub data_root: String,
    pub config_file: String,
    pub scorer: String,
    pub chunking: ChunkingView,
    pub routing: RoutingView,
    pub workers: usize,
    pub exclude_patterns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<crate::core::config::RiskConfig>,
}

#[derive(Debug, Serialize)]
pub struct ChunkingView {
    pub tokens_min: usize,
    pub tokens_max: usize,
}

#[derive(Debug, Serialize)]
pub struct RoutingView {
    pub nsfw: f64,
    pub toxicity: f64,
    pub illicit: f64,
    pub pii: f64,
}

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = &services.config;
    let xdg = crate::core::xdg::XdgDirs::new();

    let response = ConfigResponse {
        data_root: config.data_root().to_string_lossy().into_owned(),
        config_file: xdg.config_file().to_string_lossy().into_owned(),
        scorer: services.scorer.name().to_string(),
        chunking: ChunkingView {
            tokens_min: config.chunking.tokens_min,
            tokens_max: config.chunking.tokens_max,
        },
        routing: RoutingView {
            nsfw: config.routing.nsfw,
            toxicity: config.routing.toxicity,
            illicit: config.routing.illicit,
            pii: config.routing.pii,
        },
        workers: config.mining.workers,
        exclude_patterns: config.mining.exclude_patterns.clone(),
        risk: args.all.then(|| config.risk.clone()),
    };

    match format {
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  data_root: {}", response.data_root);
            println!("  config_file: {}", response.config_file);
            println!("  scorer: {}", response.scorer);
            println!("  chunking:");
            println!("    tokens_min: {}", response.chunking.tokens_min);
            println!("    tokens_max: {}", response.chunking.tokens_max);
            println!("  routing:");
            println!("    nsfw: {}", response.routing.nsfw);
            println!("    toxicity: {}", response.routing.toxicity);
            println!("    illicit: {}", response.routing.illicit);
            println!("    pii: {}", response.routing.pii);
            println!("  workers: {}", response.workers);
            println!("  exclude_patterns: {:?}", response.exclude_patterns);
            if let Some(risk) = &response.risk {
                println!("  risk:");
                println!("    nsfw_terms: {:?}", risk.nsfw_terms);
                println!("    toxicity_terms: {:?}", risk.toxicity_terms);
                println!("    illicit_phrases: {:?}", risk.illicit_phrases);
                println!("    pii_patterns: {:?}", risk.pii_patterns);
                println!("    confidence: {}", risk.confidence);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
