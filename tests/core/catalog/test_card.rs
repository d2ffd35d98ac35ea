// Dataset card contents

use crate::common::{create_test_services, mine_tree, TestTree, CLEAN_TEXT};
use chrono::Duration;
use docmine::core::catalog::{DatasetCard, CARD_FILE};

fn load_card(report: &docmine::MiningReport) -> DatasetCard {
    DatasetCard::load(&report.catalog_dir.join(CARD_FILE)).unwrap()
}

#[test]
fn test_card_matches_report() {
    let tree = TestTree::mixed();
    let dest = create_test_services();

    let report = mine_tree(&dest, tree.path(), "carded");
    let card = load_card(&report);

    assert_eq!(card.id, "carded");
    assert_eq!(card.source, tree.path().display().to_string());
    assert_eq!(card.totals.documents, report.documents);
    assert_eq!(card.totals.chunks, report.chunks);
    // clean.txt and copy-of-clean.txt share a blob
    assert_eq!(card.totals.blobs, 4);
    assert_eq!(card.routing.quarantine_docs, report.quarantined);
    assert_eq!(card.routing.clean_docs, report.clean);
    assert_eq!(card.routing.skipped_files, 0);
}

#[test]
fn test_card_risk_flags() {
    let tree = TestTree::mixed();
    let dest = create_test_services();

    let card = load_card(&mine_tree(&dest, tree.path(), "flags"));

    assert_eq!(card.nsfw, "present");
    assert_eq!(card.pii, "unknown");
}

#[test]
fn test_clean_card_defaults() {
    let tree = TestTree::with_files(&[("note.txt", CLEAN_TEXT)]);
    let dest = create_test_services();

    let card = load_card(&mine_tree(&dest, tree.path(), "plain"));

    assert_eq!(card.nsfw, "unknown");
    assert_eq!(card.toxic, "unknown");
    assert_eq!(card.pii, "unknown");
    assert_eq!(card.scope, "personal+work_mixed");
    assert_eq!(
        card.intended_use,
        vec!["discovery", "filter_training", "research"]
    );
    assert_eq!(
        card.retention.review_by,
        (card.generated_at + Duration::days(365)).date_naive()
    );
}
