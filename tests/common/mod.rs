// Common test utilities and fixtures

pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in some test binaries
#[allow(unused_imports)]
pub use fixtures::{TestTree, CLEAN_TEXT, NSFW_TEXT, PNG_BYTES};
#[allow(unused_imports)]
pub use helpers::{
    create_test_services, create_test_services_with, mine_tree, mine_tree_with, read_chunks,
    read_documents, TestDest,
};
