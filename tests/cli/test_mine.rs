//! Tests for the mine CLI command

use crate::cli::test_helpers::{create_cli_test_services, mine_args};
use crate::common::{read_documents, TestTree, CLEAN_TEXT, NSFW_TEXT};
use docmine::cli::commands::mine::execute;
use docmine::cli::OutputFormat;
use docmine::core::catalog::{read_jsonl, CARD_FILE, CHUNKS_FILE, DOCUMENTS_FILE};
use docmine::core::types::{ChunkRecord, DocumentRecord};
use tempfile::TempDir;

/// Mining a tree (human format)
#[tokio::test]
async fn test_mine_human() {
    let (services, storage) = create_cli_test_services();
    let tree = TestTree::mixed();

    let result = execute(mine_args(tree.path(), "cli-human"), &services, OutputFormat::Human).await;
    assert!(result.is_ok(), "Mine should succeed: {result:?}");

    let catalog = storage.path().join("catalog").join("cli-human");
    assert!(catalog.join(DOCUMENTS_FILE).is_file());
    assert!(catalog.join(CHUNKS_FILE).is_file());
    assert!(catalog.join(CARD_FILE).is_file());
}

/// Mining a tree (JSON format)
#[tokio::test]
async fn test_mine_json() {
    let (services, storage) = create_cli_test_services();
    let tree = TestTree::with_files(&[("a.txt", CLEAN_TEXT), ("b.txt", NSFW_TEXT)]);

    let result = execute(mine_args(tree.path(), "cli-json"), &services, OutputFormat::Json).await;
    assert!(result.is_ok(), "Mine (JSON) should succeed");

    let docs: Vec<DocumentRecord> = read_jsonl(
        &storage
            .path()
            .join("catalog")
            .join("cli-json")
            .join(DOCUMENTS_FILE),
    )
    .unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs.iter().filter(|d| d.quarantine).count(), 1);
}

/// --root sends output to a different destination
#[tokio::test]
async fn test_mine_root_override() {
    let (services, storage) = create_cli_test_services();
    let other = TempDir::new().unwrap();
    let tree = TestTree::with_files(&[("a.txt", CLEAN_TEXT)]);

    let mut args = mine_args(tree.path(), "elsewhere");
    args.root = Some(other.path().to_path_buf());
    execute(args, &services, OutputFormat::Json).await.unwrap();

    assert!(other.path().join("catalog").join("elsewhere").is_dir());
    assert!(!storage.path().join("catalog").exists());
}

/// Token and exclude overrides reach the pipeline
#[tokio::test]
async fn test_mine_overrides() {
    let (services, storage) = create_cli_test_services();
    let text = (0..6)
        .map(|i| format!("para{i} one two three"))
        .collect::<Vec<_>>()
        .join("\n\n");
    let tree = TestTree::with_files(&[("long.txt", text.as_str()), ("skip/me.txt", CLEAN_TEXT)]);

    let mut args = mine_args(tree.path(), "tuned");
    args.tokens_min = Some(4);
    args.tokens_max = Some(8);
    args.workers = Some(2);
    args.exclude = vec!["**/skip".to_string()];
    execute(args, &services, OutputFormat::Json).await.unwrap();

    let catalog = storage.path().join("catalog").join("tuned");
    let docs: Vec<DocumentRecord> = read_jsonl(&catalog.join(DOCUMENTS_FILE)).unwrap();
    let chunks: Vec<ChunkRecord> = read_jsonl(&catalog.join(CHUNKS_FILE)).unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(chunks.len(), 3);

    // Shared config is untouched by per-run overrides
    assert_eq!(services.config.chunking.tokens_max, 900);
}

/// Missing input directory fails with a readable message
#[tokio::test]
async fn test_mine_missing_input() {
    let (services, _storage) = create_cli_test_services();

    let args = mine_args(std::path::Path::new("/nonexistent/docmine/input"), "ds");
    let err = execute(args, &services, OutputFormat::Human)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invalid input"));
}

/// Invalid dataset id is rejected before any output is written
#[tokio::test]
async fn test_mine_invalid_dataset_id() {
    let (services, storage) = create_cli_test_services();
    let tree = TestTree::with_files(&[("a.txt", CLEAN_TEXT)]);

    let result = execute(mine_args(tree.path(), "../up"), &services, OutputFormat::Json).await;
    assert!(result.is_err());
    assert!(!storage.path().join("bronze_raw").exists());
}

/// Inverted token bounds are a configuration error
#[tokio::test]
async fn test_mine_invalid_token_bounds() {
    let (services, _storage) = create_cli_test_services();
    let tree = TestTree::with_files(&[("a.txt", CLEAN_TEXT)]);

    let mut args = mine_args(tree.path(), "bounds");
    args.tokens_min = Some(50);
    args.tokens_max = Some(10);
    let err = execute(args, &services, OutputFormat::Human)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("tokens_min"));
}

/// The committed catalog records the canonical input path
#[tokio::test]
async fn test_mine_records_canonical_source() {
    let (services, storage) = create_cli_test_services();
    let tree = TestTree::with_files(&[("a.txt", CLEAN_TEXT)]);

    execute(mine_args(tree.path(), "canon"), &services, OutputFormat::Json)
        .await
        .unwrap();

    let report = docmine::MiningReport {
        catalog_dir: storage.path().join("catalog").join("canon"),
        ..Default::default()
    };
    let docs = read_documents(&report);
    let canonical = tree.path().canonicalize().unwrap();
    assert!(docs[0].source_path.starts_with(&canonical));
}
