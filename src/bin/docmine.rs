//! docmine - command-line entry point
//!
//! # Examples
//!
//! ```bash
//! # Mine a directory tree into the default data root
//! docmine mine ~/Documents --dataset-id personal-docs
//!
//! # Mine with four workers into an explicit destination
//! docmine mine ./inbox -d inbox-2024 --root /srv/mined --workers 4
//!
//! # Inspect the resulting dataset card
//! docmine show-card personal-docs
//!
//! # Show configuration
//! docmine show-config --format json
//! ```

use clap::Parser;
use docmine::cli::output::print_error;
use docmine::cli::{run, Cli};

fn init_logging() {
    // stdout carries command output; logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docmine=info".into()),
        )
        .compact()
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
