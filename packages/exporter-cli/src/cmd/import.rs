//! Push compiled payloads into the destination space.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use contentful_client::ContentfulClient;
use migration::layout::{read_json, write_json};
use migration::pipeline::ImportError;
use migration::{
    import_in_chunks, ImportKind, ImportReport, SpaceConfig, SpaceImporter,
    DEFAULT_SPACE_CONFIG_DIR,
};
use serde_json::Value;
use tracing::{error, info};

use crate::cmd::Context;

/// The management client as the chunk runner sees it.
pub struct ContentfulImporter {
    client: ContentfulClient,
}

impl ContentfulImporter {
    pub fn new(client: ContentfulClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SpaceImporter for ContentfulImporter {
    async fn import_entries(&self, space_id: &str, entries: &[Value]) -> Result<(), ImportError> {
        Ok(self.client.import_entries(space_id, entries).await?)
    }

    async fn import_assets(&self, space_id: &str, assets: &[Value]) -> Result<(), ImportError> {
        Ok(self.client.import_assets(space_id, assets).await?)
    }
}

fn log_failures(report: &ImportReport) {
    if !report.is_success() {
        error!(
            "{} of {} chunk(s) failed: {:?}; fix the data and re-run the import",
            report.failed_chunks.len(),
            report.chunks,
            report.failed_chunks
        );
    }
}

pub async fn entries(ctx: &Context, chunk_size: usize) -> Result<()> {
    let config = SpaceConfig::load(Path::new(DEFAULT_SPACE_CONFIG_DIR), ctx.site, &ctx.lang)?;
    let records: Vec<Value> = read_json(&ctx.layout().entries_file())?;

    let importer = ContentfulImporter::new(ContentfulClient::from_env()?);
    let report =
        import_in_chunks(&importer, &config.id, ImportKind::Entries, &records, chunk_size).await;
    log_failures(&report);

    Ok(())
}

pub async fn assets(ctx: &Context, chunk_size: usize) -> Result<()> {
    let config = SpaceConfig::load(Path::new(DEFAULT_SPACE_CONFIG_DIR), ctx.site, &ctx.lang)?;
    let layout = ctx.layout();
    let records: Vec<Value> = read_json(&layout.assets_file())?;

    let importer = ContentfulImporter::new(ContentfulClient::from_env()?);
    let report =
        import_in_chunks(&importer, &config.id, ImportKind::Assets, &records, chunk_size).await;
    log_failures(&report);

    // The prepare entries step rewrites body URLs against what the
    // space actually serves, so snapshot the assets as imported.
    info!("Fetching Contentful assets URLs from space {}", config.id);
    let exported = importer.client.export_assets(&config.id).await?;
    write_json(&layout.exported_assets_file(), &exported)?;

    Ok(())
}
