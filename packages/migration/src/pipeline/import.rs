//! Chunked submission to the destination space.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info};

/// How many records go into one submission.
pub const DEFAULT_CHUNK_SIZE: usize = 10;

/// Error type the destination seam reports; clients box their own.
pub type ImportError = Box<dyn std::error::Error + Send + Sync>;

/// Destination seam for bulk pushes. Implemented by the management API
/// client and by the in-memory mock in [`crate::testing`].
#[async_trait]
pub trait SpaceImporter {
    async fn import_entries(
        &self,
        space_id: &str,
        entries: &[Value],
    ) -> std::result::Result<(), ImportError>;

    async fn import_assets(
        &self,
        space_id: &str,
        assets: &[Value],
    ) -> std::result::Result<(), ImportError>;
}

/// What gets pushed, deciding which importer method runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Entries,
    Assets,
}

impl ImportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ImportKind::Entries => "entries",
            ImportKind::Assets => "assets",
        }
    }
}

/// Outcome of one chunked import run.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub total: usize,
    pub chunks: usize,
    /// 1-based indices of chunks the destination rejected.
    pub failed_chunks: Vec<usize>,
}

impl ImportReport {
    pub fn is_success(&self) -> bool {
        self.failed_chunks.is_empty()
    }
}

/// Push records in fixed-size chunks, sequentially and in order. A
/// rejected chunk is logged and recorded in the report; the remaining
/// chunks still run.
pub async fn import_in_chunks<I: SpaceImporter + ?Sized>(
    importer: &I,
    space_id: &str,
    kind: ImportKind,
    records: &[Value],
    chunk_size: usize,
) -> ImportReport {
    let chunk_size = chunk_size.max(1);
    let chunk_count = records.chunks(chunk_size).len();
    let mut failed_chunks = Vec::new();

    info!(
        "Importing {} {} into {} chunk(s) to space {}",
        records.len(),
        kind.as_str(),
        chunk_count,
        space_id
    );

    for (index, chunk) in records.chunks(chunk_size).enumerate() {
        let chunk_no = index + 1;
        info!(
            "Processing chunk {}/{} ({} records)",
            chunk_no,
            chunk_count,
            chunk.len()
        );
        let result = match kind {
            ImportKind::Entries => importer.import_entries(space_id, chunk).await,
            ImportKind::Assets => importer.import_assets(space_id, chunk).await,
        };
        if let Err(err) = result {
            error!("Import of chunk {} failed: {}", chunk_no, err);
            failed_chunks.push(chunk_no);
        }
    }

    ImportReport {
        total: records.len(),
        chunks: chunk_count,
        failed_chunks,
    }
}
