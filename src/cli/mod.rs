//! CLI adapter for docmine
//!
//! Thin clap front end over `core/`: argument parsing, per-run
//! overrides and output formatting. All mining logic lives in core.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// docmine - mine a directory tree into a reviewable text dataset
///
/// Stores raw files by content digest, extracts and normalizes text,
/// chunks it, scores each chunk for risk and routes documents into a
/// normalized or quarantine zone with a catalog and dataset card.
#[derive(Parser, Debug)]
#[command(name = "docmine")]
#[command(version)]
#[command(about = "Document mining pipeline", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mine a directory tree into the destination root
    Mine(commands::MineArgs),

    /// Show the dataset card of a mined dataset
    #[command(name = "show-card")]
    ShowCard(commands::CardArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  docmine completions bash > ~/.local/share/bash-completion/completions/docmine
    ///   zsh:   docmine completions zsh > ~/.zfunc/_docmine
    ///   fish:  docmine completions fish > ~/.config/fish/completions/docmine.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;
    use std::sync::Arc;

    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let xdg = XdgDirs::new();
    xdg.log_paths();

    // Load configuration; invalid config is fatal before any work
    let config = Config::load_with_xdg(&xdg)?;

    let services = Arc::new(Services::new(config)?);

    match cli.command {
        Commands::Mine(args) => commands::mine::execute(args, &services, cli.format).await,
        Commands::ShowCard(args) => commands::card::execute(args, &services, cli.format).await,
        Commands::ShowConfig(args) => {
            commands::config::execute(args, &services, cli.format).await
        }
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
