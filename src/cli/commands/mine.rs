//! Mine command - mine a directory tree into the destination root

use crate::cli::output::{colors, format_bytes, format_duration};
use crate::cli::OutputFormat;
use crate::core::catalog::{CARD_FILE, CHUNKS_FILE, DOCUMENTS_FILE};
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the mine command
#[derive(Args, Debug)]
pub struct MineArgs {
    /// Directory tree to mine
    pub input: PathBuf,

    /// Dataset identifier (names the catalog directory)
    #[arg(long, short = 'd')]
    pub dataset_id: String,

    /// Destination root (overrides storage.data_root)
    #[arg(long, short = 'r')]
    pub root: Option<PathBuf>,

    /// Minimum tokens before a chunk may be flushed
    #[arg(long)]
    pub tokens_min: Option<usize>,

    /// Maximum tokens a chunk buffer may grow to
    #[arg(long)]
    pub tokens_max: Option<usize>,

    /// Files processed concurrently
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,

    /// Glob patterns to exclude (can be specified multiple times)
    #[arg(long, short = 'e')]
    pub exclude: Vec<String>,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Mining result response
#[derive(Debug, Serialize)]
pub struct MineResponse {
    pub dataset_id: String,
    pub input: String,
    pub documents: usize,
    pub bytes: u64,
    pub chunks: usize,
    pub quarantined: usize,
    pub clean: usize,
    pub skipped_files: usize,
    pub blobs_written: usize,
    pub duplicate_blobs: usize,
    pub duration_secs: f64,
    pub documents_table: String,
    pub chunks_table: String,
    pub dataset_card: String,
}

/// Execute the mine command
pub async fn execute(
    args: MineArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = args.input.canonicalize().map_err(|e| {
        format!(
            "Invalid input '{}': {}. Make sure the path exists and is accessible.",
            args.input.display(),
            e
        )
    })?;

    // Per-run overrides on top of the loaded configuration
    let mut config = (*services.config).clone();
    if let Some(root) = args.root {
        config.storage.data_root = Some(root);
    }
    if let Some(min) = args.tokens_min {
        config.chunking.tokens_min = min;
    }
    if let Some(max) = args.tokens_max {
        config.chunking.tokens_max = max;
    }
    if let Some(workers) = args.workers {
        config.mining.workers = workers;
    }
    config.mining.exclude_patterns.extend(args.exclude);

    let pipeline = services.create_pipeline_with(&config)?;

    if !args.quiet && format == OutputFormat::Human {
        eprintln!(
            "Mining {} as '{}' into {}...",
            colors::file_path(&input.display().to_string()),
            colors::dataset_id(&args.dataset_id),
            colors::file_path(&config.data_root().display().to_string())
        );
    }

    let dataset_id = args.dataset_id;
    let run_input = input.clone();
    let run_id = dataset_id.clone();
    let report = tokio::task::spawn_blocking(move || pipeline.mine(&run_input, &run_id)).await??;

    let response = MineResponse {
        dataset_id,
        input: input.to_string_lossy().into_owned(),
        documents: report.documents,
        bytes: report.bytes,
        chunks: report.chunks,
        quarantined: report.quarantined,
        clean: report.clean,
        skipped_files: report.skipped_files,
        blobs_written: report.blobs_written,
        duplicate_blobs: report.duplicate_blobs,
        duration_secs: report.duration_ms as f64 / 1000.0,
        documents_table: report.catalog_dir.join(DOCUMENTS_FILE).display().to_string(),
        chunks_table: report.catalog_dir.join(CHUNKS_FILE).display().to_string(),
        dataset_card: report.catalog_dir.join(CARD_FILE).display().to_string(),
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} documents ({}, {} chunks) in {}",
                colors::success("Mined"),
                colors::number(&response.documents.to_string()),
                colors::number(&format_bytes(response.bytes)),
                colors::number(&response.chunks.to_string()),
                colors::number(&format_duration(response.duration_secs))
            );
            println!(
                "  {} {}  {} {}",
                colors::label("Clean:"),
                colors::success(&response.clean.to_string()),
                colors::label("Quarantined:"),
                colors::quarantine(&response.quarantined.to_string())
            );
            if response.skipped_files > 0 {
                println!(
                    "  {} {}",
                    colors::label("Skipped:"),
                    colors::warning(&response.skipped_files.to_string())
                );
            }
            println!(
                "  {} {} new, {} already stored",
                colors::label("Blobs:"),
                colors::number(&response.blobs_written.to_string()),
                colors::number(&response.duplicate_blobs.to_string())
            );
            for (label, path) in [
                ("Documents:", &response.documents_table),
                ("Chunks:", &response.chunks_table),
                ("Card:", &response.dataset_card),
            ] {
                println!("  {} {}", colors::label(label), colors::file_path(path));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
