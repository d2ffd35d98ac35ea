// Failure handling
//
// Startup errors abort before any file is read; a failure on one
// file is counted as skipped and never stops the run.

use crate::common::{
    create_test_services, create_test_services_with, mine_tree, read_documents, TestTree,
    CLEAN_TEXT, NSFW_TEXT,
};
use std::fs;

#[test]
fn test_per_file_failure_does_not_abort_run() {
    let tree = TestTree::with_files(&[("a-clean.txt", CLEAN_TEXT), ("b-bad.txt", NSFW_TEXT)]);
    let dest = create_test_services();

    // A regular file where the normalized zone's docs directory belongs
    // makes every clean document fail to persist its text
    fs::create_dir_all(dest.root().join("silver_normalized")).unwrap();
    fs::write(dest.root().join("silver_normalized").join("docs"), "blocker").unwrap();

    let report = mine_tree(&dest, tree.path(), "partial");

    assert_eq!(report.skipped_files, 1);
    assert_eq!(report.documents, 1);
    assert_eq!(report.quarantined, 1);
    let docs = read_documents(&report);
    assert!(docs[0].source_path.ends_with("b-bad.txt"));
}

#[test]
fn test_missing_input_root_is_fatal() {
    let dest = create_test_services();
    let pipeline = dest.services.create_pipeline().unwrap();

    let err = pipeline
        .mine(&dest.root().join("missing"), "ds")
        .unwrap_err();

    assert!(err.is_config());
    assert!(!dest.root().join("catalog").join("ds").exists());
}

#[test]
fn test_invalid_dataset_id_is_fatal() {
    let tree = TestTree::with_files(&[("a.txt", CLEAN_TEXT)]);
    let dest = create_test_services();
    let pipeline = dest.services.create_pipeline().unwrap();

    for id in ["", "../escape", "has space"] {
        let err = pipeline.mine(tree.path(), id).unwrap_err();
        assert!(err.is_config(), "{id:?} should be rejected");
    }
    assert!(!dest.root().join("bronze_raw").exists());
}

#[test]
fn test_invalid_thresholds_fail_pipeline_creation() {
    let dest = create_test_services_with(|c| c.routing.illicit = 1.5);
    assert!(dest.services.create_pipeline().unwrap_err().is_config());
}

#[test]
fn test_empty_tree_commits_empty_catalog() {
    let tree = TestTree::with_files(&[]);
    let dest = create_test_services();

    let report = mine_tree(&dest, tree.path(), "empty");

    assert_eq!(report.documents, 0);
    assert_eq!(report.chunks, 0);
    assert!(report.catalog_dir.join("dataset_card.toml").is_file());
}
