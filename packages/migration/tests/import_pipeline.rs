//! The prepare-to-import handoff: the payload written by the entries
//! step drives the chunked submission as-is.

mod common;

use common::*;
use migration::layout::read_json;
use migration::testing::MockImporter;
use migration::{import_in_chunks, prepare_entries, ImportKind};
use serde_json::Value;
use std::path::Path;

fn compiled_entries(dir: &Path) -> Vec<Value> {
    let layout = seed_minimal(dir);
    prepare_entries(&base_settings(), &layout, "en", "https://www.example.com").unwrap();
    read_json(&layout.entries_file()).unwrap()
}

#[tokio::test]
async fn compiled_entries_flow_through_the_chunked_import() {
    let dir = tempfile::tempdir().unwrap();
    let records = compiled_entries(dir.path());
    // One author, one category, one post.
    assert_eq!(records.len(), 3);

    let importer = MockImporter::new();
    let report = import_in_chunks(&importer, "sp4c3", ImportKind::Entries, &records, 2).await;

    assert_eq!(report.total, 3);
    assert_eq!(report.chunks, 2);
    assert!(report.is_success());
    assert_eq!(importer.entry_batches(), vec![2, 1]);

    // Exactly the compiled payload reaches the destination, in order.
    let submitted_ids: Vec<String> = importer
        .submitted()
        .iter()
        .map(|r| r["sys"]["id"].as_str().unwrap().to_string())
        .collect();
    let payload_ids: Vec<String> = records
        .iter()
        .map(|r| r["sys"]["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(submitted_ids, payload_ids);
}

#[tokio::test]
async fn a_rejected_chunk_leaves_the_rest_delivered() {
    let dir = tempfile::tempdir().unwrap();
    let records = compiled_entries(dir.path());

    let importer = MockImporter::new().fail_on_call(1);
    let report = import_in_chunks(&importer, "sp4c3", ImportKind::Entries, &records, 2).await;

    assert!(!report.is_success());
    assert_eq!(report.failed_chunks, vec![1]);
    assert_eq!(importer.entry_batches(), vec![2, 1]);
}
