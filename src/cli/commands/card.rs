//! Show-card command - print the dataset card of a mined dataset

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::catalog::{validate_dataset_id, DatasetCard, CARD_FILE};
use crate::core::services::Services;
use crate::core::store::ZoneLayout;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the show-card command
#[derive(Args, Debug)]
pub struct CardArgs {
    /// Dataset identifier
    pub dataset_id: String,

    /// Destination root (overrides storage.data_root)
    #[arg(long, short = 'r')]
    pub root: Option<PathBuf>,
}

/// Execute the show-card command
pub async fn execute(
    args: CardArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    validate_dataset_id(&args.dataset_id)?;

    let layout = match args.root {
        Some(root) => ZoneLayout::new(root),
        None => services.layout(),
    };
    let path = layout.dataset_catalog_dir(&args.dataset_id).join(CARD_FILE);
    if !path.is_file() {
        return Err(format!(
            "Dataset '{}' has no card at {}. Run 'docmine mine' first.",
            args.dataset_id,
            path.display()
        )
        .into());
    }

    let card = DatasetCard::load(&path)?;

    match format {
        OutputFormat::Human => {
            println!("{} {}", colors::label("Dataset:"), colors::dataset_id(&card.id));
            println!("  source: {}", colors::file_path(&card.source));
            println!("  generated_at: {}", card.generated_at.to_rfc3339());
            println!("  scope: {}", card.scope);
            println!("  license: {}", card.license_summary);
            println!(
                "  risk: pii {} / nsfw {} / toxic {}",
                card.pii, card.nsfw, card.toxic
            );
            println!(
                "  routing: {} clean, {} quarantined, {} skipped",
                colors::success(&card.routing.clean_docs.to_string()),
                colors::quarantine(&card.routing.quarantine_docs.to_string()),
                colors::number(&card.routing.skipped_files.to_string())
            );
            println!(
                "  totals: {} documents, {} chunks, {} blobs",
                colors::number(&card.totals.documents.to_string()),
                colors::number(&card.totals.chunks.to_string()),
                colors::number(&card.totals.blobs.to_string())
            );
            println!("  review_by: {}", card.retention.review_by);
            println!("  intended_use: {}", card.intended_use.join(", "));
            println!("  {}", colors::dim(&card.provenance_notes));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
    }

    Ok(())
}
