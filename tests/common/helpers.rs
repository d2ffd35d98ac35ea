// Test helper functions

use docmine::core::catalog::{read_jsonl, CHUNKS_FILE, DOCUMENTS_FILE};
use docmine::core::config::Config;
use docmine::core::services::Services;
use docmine::core::types::{ChunkRecord, DocumentRecord, MiningReport};
use std::path::Path;
use tempfile::TempDir;

/// Temporary destination root plus services pointing at it
#[allow(dead_code)]
pub struct TestDest {
    pub dir: TempDir,
    pub services: Services,
}

impl TestDest {
    #[allow(dead_code)]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

/// Create test services with a temporary destination root
#[allow(dead_code)]
pub fn create_test_services() -> TestDest {
    create_test_services_with(|_| {})
}

/// Create test services, adjusting the default config first
#[allow(dead_code)]
pub fn create_test_services_with(adjust: impl FnOnce(&mut Config)) -> TestDest {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = Config::default();
    config.storage.data_root = Some(dir.path().to_path_buf());
    adjust(&mut config);

    let services = Services::new(config).expect("Failed to create services");
    TestDest { dir, services }
}

/// Mine a tree with default settings
#[allow(dead_code)]
pub fn mine_tree(dest: &TestDest, input: &Path, dataset_id: &str) -> MiningReport {
    dest.services
        .create_pipeline()
        .expect("Failed to create pipeline")
        .mine(input, dataset_id)
        .expect("Mining failed")
}

/// Mine a tree with a per-run config override
#[allow(dead_code)]
pub fn mine_tree_with(
    dest: &TestDest,
    input: &Path,
    dataset_id: &str,
    adjust: impl FnOnce(&mut Config),
) -> MiningReport {
    let mut config = (*dest.services.config).clone();
    adjust(&mut config);
    dest.services
        .create_pipeline_with(&config)
        .expect("Failed to create pipeline")
        .mine(input, dataset_id)
        .expect("Mining failed")
}

/// Read the committed documents table
#[allow(dead_code)]
pub fn read_documents(report: &MiningReport) -> Vec<DocumentRecord> {
    read_jsonl(&report.catalog_dir.join(DOCUMENTS_FILE)).expect("Failed to read documents")
}

/// Read the committed chunks table
#[allow(dead_code)]
pub fn read_chunks(report: &MiningReport) -> Vec<ChunkRecord> {
    read_jsonl(&report.catalog_dir.join(CHUNKS_FILE)).expect("Failed to read chunks")
}
