// Catalog replacement across runs

use crate::common::{
    create_test_services, mine_tree, read_documents, TestTree, CLEAN_TEXT, NSFW_TEXT,
};
use std::fs;

fn catalog_entries(root: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root.join("catalog"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_rerun_replaces_catalog() {
    let first = TestTree::with_files(&[("a.txt", CLEAN_TEXT), ("b.txt", NSFW_TEXT)]);
    let second = TestTree::with_files(&[("only.txt", "a single fresh note")]);
    let dest = create_test_services();

    let before = mine_tree(&dest, first.path(), "notes");
    assert_eq!(read_documents(&before).len(), 2);

    let after = mine_tree(&dest, second.path(), "notes");
    assert_eq!(after.catalog_dir, before.catalog_dir);

    let docs = read_documents(&after);
    assert_eq!(docs.len(), 1);
    assert!(docs[0].source_path.ends_with("only.txt"));
    assert_eq!(catalog_entries(dest.root()), vec!["notes".to_string()]);
}

#[test]
fn test_rerun_keeps_raw_store() {
    let tree = TestTree::with_files(&[("a.txt", CLEAN_TEXT)]);
    let dest = create_test_services();

    let first = mine_tree(&dest, tree.path(), "again");
    let second = mine_tree(&dest, tree.path(), "again");

    assert_eq!(first.blobs_written, 1);
    assert_eq!(second.blobs_written, 0);
    assert_eq!(second.duplicate_blobs, 1);
    assert_eq!(read_documents(&first), read_documents(&second));
}

#[test]
fn test_datasets_coexist() {
    let work = TestTree::with_files(&[("report.txt", CLEAN_TEXT)]);
    let home = TestTree::with_files(&[("chat.txt", NSFW_TEXT)]);
    let dest = create_test_services();

    let w = mine_tree(&dest, work.path(), "work");
    let h = mine_tree(&dest, home.path(), "home");

    assert_eq!(
        catalog_entries(dest.root()),
        vec!["home".to_string(), "work".to_string()]
    );
    assert_eq!(read_documents(&w)[0].dataset_id, "work");
    assert_eq!(read_documents(&h)[0].dataset_id, "home");
    assert!(read_documents(&h)[0].quarantine);
}
