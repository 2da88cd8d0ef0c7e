//! The prepare assets step: collect every image a language's posts
//! reference and compile the upload payload.
//!
//! URLs are normalized to their protocol-relative CDN form before
//! anything else, so the payload, the asset ids and the lookup maps the
//! entries step builds later all key on the same string.

use tracing::info;

use crate::compile::{asset, asset_id, Asset};
use crate::error::Result;
use crate::layout::{write_json, DataDir};
use crate::rewrite::{rewrite_with_cdn, LinkRewriter};
use crate::types::entry::{load_dump_dir, EntryKind, Post};

/// What one prepare assets run produced.
#[derive(Debug, Default)]
pub struct AssetSummary {
    pub posts: usize,
    pub assets: usize,
}

/// Scan every dumped post of one language and write `assets.json`.
///
/// Besides upload URLs in the body, a post contributes its featured
/// media URL and the first ACF landscape image, both stamped by the
/// exporter outside the rendered HTML.
pub fn prepare_assets(layout: &DataDir, lang: &str, host: &str) -> Result<AssetSummary> {
    let rewriter = LinkRewriter::for_host(host)?;
    let posts: Vec<Post> = load_dump_dir(&layout.dump_entries(EntryKind::Post))?;

    let mut urls = indexmap::IndexSet::new();
    for post in &posts {
        for url in rewriter.discover_asset_urls(post.body_html()) {
            urls.insert(rewrite_with_cdn(&url));
        }
        if let Some(url) = post.featured_media_url.as_deref() {
            urls.insert(rewrite_with_cdn(url));
        }
        if let Some(url) = post.landscape_image_url() {
            urls.insert(rewrite_with_cdn(url));
        }
    }

    info!(
        "Preparing {} Asset entries from {} posts",
        urls.len(),
        posts.len()
    );

    let assets: Vec<Asset> = urls
        .iter()
        .map(|url| asset(lang, asset_id(url), url.clone()))
        .collect();
    write_json(&layout.assets_file(), &assets)?;

    Ok(AssetSummary {
        posts: posts.len(),
        assets: assets.len(),
    })
}
