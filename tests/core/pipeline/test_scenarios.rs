// End-to-end routing scenarios
//
// One clean file, one risky file, byte-identical duplicates and a
// binary file, each checked through the committed catalog and the
// destination tree.

use crate::common::{
    create_test_services, mine_tree, read_chunks, read_documents, TestTree, CLEAN_TEXT, NSFW_TEXT,
    PNG_BYTES,
};
use docmine::core::store::{ContentStore, ZoneLayout};
use docmine::core::types::Zone;

#[test]
fn test_clean_file_is_normalized() {
    let tree = TestTree::with_files(&[("note.txt", CLEAN_TEXT)]);
    let dest = create_test_services();

    let report = mine_tree(&dest, tree.path(), "clean");

    assert_eq!(report.documents, 1);
    assert_eq!(report.clean, 1);
    assert_eq!(report.quarantined, 0);

    let docs = read_documents(&report);
    let doc = &docs[0];
    assert!(!doc.quarantine);
    assert!(doc.risk_tags.is_empty());
    assert_eq!(doc.lang, "und");
    assert_eq!(doc.title.as_deref(), Some("note.txt"));
    assert_eq!(doc.author, None);
    assert_eq!(doc.bytes, CLEAN_TEXT.len() as u64);
    assert!(doc.modified_ts.is_some());

    let chunks = read_chunks(&report);
    assert!(!chunks.is_empty());
    assert!(chunks.iter().any(|c| c.text.contains(CLEAN_TEXT)));

    let layout = ZoneLayout::new(dest.root());
    let text_path = layout.document_text_path(Zone::Normalized, &doc.checksum);
    assert_eq!(std::fs::read_to_string(text_path).unwrap(), CLEAN_TEXT);
    assert!(!layout
        .document_text_path(Zone::Quarantined, &doc.checksum)
        .exists());
}

#[test]
fn test_nsfw_file_is_quarantined() {
    let tree = TestTree::with_files(&[("bad.txt", NSFW_TEXT)]);
    let dest = create_test_services();

    let report = mine_tree(&dest, tree.path(), "risky");

    assert_eq!(report.quarantined, 1);
    let doc = &read_documents(&report)[0];
    assert!(doc.quarantine);
    assert!(doc.risk_tags.contains(&"nsfw".to_string()));
    assert_eq!(doc.nsfw_score, 1.0);

    let layout = ZoneLayout::new(dest.root());
    assert!(layout
        .document_text_path(Zone::Quarantined, &doc.checksum)
        .is_file());
    assert!(layout
        .chunk_text_path(Zone::Quarantined, &doc.checksum, &doc.doc_uid, 0)
        .is_file());
    assert!(!layout
        .document_text_path(Zone::Normalized, &doc.checksum)
        .exists());
}

#[test]
fn test_identical_files_share_one_blob() {
    let tree = TestTree::with_files(&[("a/one.txt", CLEAN_TEXT), ("b/two.txt", CLEAN_TEXT)]);
    let dest = create_test_services();

    let report = mine_tree(&dest, tree.path(), "dupes");

    let store = ContentStore::open(dest.root().join("bronze_raw")).unwrap();
    assert_eq!(store.blob_count(), 1);
    assert_eq!(report.blobs_written, 1);
    assert_eq!(report.duplicate_blobs, 1);

    let docs = read_documents(&report);
    assert_eq!(docs.len(), 2);
    assert_ne!(docs[0].source_path, docs[1].source_path);
    assert_eq!(docs[0].doc_uid, docs[1].doc_uid);
    assert_eq!(docs[0].checksum, docs[1].checksum);
    assert!(docs[0].checksum.starts_with(&docs[0].doc_uid));

    // One chunk sequence per doc_uid
    let chunks = read_chunks(&report);
    assert_eq!(chunks.len(), docs[0].chunk_count);
}

#[test]
fn test_binary_file_is_non_text() {
    let tree = TestTree::with_bytes(&[("logo.png", PNG_BYTES)]);
    let dest = create_test_services();

    let report = mine_tree(&dest, tree.path(), "binary");

    assert_eq!(report.documents, 1);
    assert_eq!(report.chunks, 0);
    let doc = &read_documents(&report)[0];
    assert_eq!(doc.chunk_count, 0);
    assert!(doc.quarantine);
    assert_eq!(doc.risk_tags, vec!["non-text".to_string()]);
    assert_eq!(doc.mime, "image/png");
    assert_eq!(doc.charset, None);
    assert_eq!(doc.scores().nsfw, 0.0);

    // Raw bytes are kept, no text is written
    let store = ContentStore::open(dest.root().join("bronze_raw")).unwrap();
    assert!(store.contains(&doc.checksum));
    let layout = ZoneLayout::new(dest.root());
    assert!(!layout
        .document_text_path(Zone::Quarantined, &doc.checksum)
        .exists());
}

#[test]
fn test_mixed_tree_summary() {
    let tree = TestTree::mixed();
    let dest = create_test_services();

    let report = mine_tree(&dest, tree.path(), "mixed");

    // clean, copy-of-clean, page.html clean; bad.txt and logo.png quarantined
    assert_eq!(report.documents, 5);
    assert_eq!(report.clean, 3);
    assert_eq!(report.quarantined, 2);
    assert_eq!(report.skipped_files, 0);

    let docs = read_documents(&report);
    let page = docs
        .iter()
        .find(|d| d.source_path.ends_with("page.html"))
        .unwrap();
    assert_eq!(page.mime, "text/html");
    let page_chunks: Vec<_> = read_chunks(&report)
        .into_iter()
        .filter(|c| c.doc_uid == page.doc_uid)
        .collect();
    assert_eq!(page_chunks.len(), 1);
    assert_eq!(page_chunks[0].text, "Plain page");
}

#[test]
fn test_legacy_encoding_is_decoded() {
    let tree = TestTree::with_bytes(&[(
        "fr.txt",
        b"Le caf\xe9 na\xefve est tr\xe8s agr\xe9able, d\xe9j\xe0 vu.".as_slice(),
    )]);
    let dest = create_test_services();

    let report = mine_tree(&dest, tree.path(), "legacy");

    let doc = &read_documents(&report)[0];
    assert!(!doc.quarantine);
    assert_ne!(doc.charset.as_deref(), Some("utf-8"));
    assert!(read_chunks(&report)[0].text.contains("café"));
}

#[cfg(unix)]
#[test]
fn test_symlinked_file_is_mined() {
    let tree = TestTree::with_files(&[("real/a.txt", CLEAN_TEXT)]);
    std::os::unix::fs::symlink(tree.path().join("real/a.txt"), tree.path().join("link.txt"))
        .unwrap();
    std::os::unix::fs::symlink(tree.path().join("gone.txt"), tree.path().join("broken.txt"))
        .unwrap();
    let dest = create_test_services();

    let report = mine_tree(&dest, tree.path(), "links");

    assert_eq!(report.documents, 2);
    assert_eq!(report.skipped_files, 1);
    assert_eq!(report.blobs_written, 1);

    let docs = read_documents(&report);
    assert!(docs.iter().any(|d| d.source_path.ends_with("link.txt")));
    assert!(docs.iter().any(|d| d.source_path.ends_with("real/a.txt")));
    assert_eq!(docs[0].doc_uid, docs[1].doc_uid);
}
