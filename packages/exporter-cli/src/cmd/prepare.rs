//! Compile dumped content into Contentful payloads.

use anyhow::Result;
use migration::{prepare_assets, prepare_entries, Settings};
use tracing::{info, warn};

use crate::cmd::Context;

pub fn assets(ctx: &Context) -> Result<()> {
    let layout = ctx.layout();
    let summary = prepare_assets(&layout, &ctx.lang, &ctx.host)?;

    info!(
        "Prepared {} assets from {} posts",
        summary.assets, summary.posts
    );
    Ok(())
}

pub fn entries(ctx: &Context) -> Result<()> {
    let settings = Settings::load(&ctx.settings)?;
    let layout = ctx.layout();
    let summary = prepare_entries(&settings, &layout, &ctx.lang, &ctx.host)?;

    info!(
        "Prepared {} authors, {} categories, {} tags and {} posts",
        summary.authors, summary.categories, summary.tags, summary.posts
    );
    if summary.orphaned > 0 {
        warn!(
            "{} posts had no source translation and kept their own ids",
            summary.orphaned
        );
    }
    if !summary.unresolved_assets.is_empty() {
        warn!(
            "{} asset URLs had no imported asset and were left unrewritten",
            summary.unresolved_assets.len()
        );
    }
    Ok(())
}
