//! CLI test helpers
//!
//! Arc<Services> wrappers matching the CLI execute() signatures and
//! a shorthand for building mine arguments.

use docmine::cli::commands::MineArgs;
use docmine::core::config::Config;
use docmine::core::services::Services;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Create test services wrapped in Arc (matching CLI execute() signatures)
pub fn create_cli_test_services() -> (Arc<Services>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = Config::default();
    config.storage.data_root = Some(temp_dir.path().to_path_buf());

    let services = Arc::new(Services::new(config).expect("Failed to create services"));
    (services, temp_dir)
}

/// Mine arguments with every override left unset
pub fn mine_args(input: &Path, dataset_id: &str) -> MineArgs {
    MineArgs {
        input: input.to_path_buf(),
        dataset_id: dataset_id.to_string(),
        root: None,
        tokens_min: None,
        tokens_max: None,
        workers: None,
        exclude: Vec::new(),
        quiet: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_cli_test_services() {
        let (services, temp) = create_cli_test_services();
        assert_eq!(services.config.data_root(), temp.path());
        assert_eq!(services.scorer.name(), "pattern");
    }

    #[test]
    fn test_mine_args_defaults() {
        let args = mine_args(Path::new("/tmp/in"), "ds");
        assert_eq!(args.dataset_id, "ds");
        assert!(args.exclude.is_empty());
        assert!(args.quiet);
    }
}
