//! Dump WordPress content to local JSON files.
//!
//! Recreates the per-language data directory, then writes one file per
//! category, tag and post under `dump/entries/{kind}/{site}-{id}.json`.
//! Excluded categories are dropped before posts are fetched, so posts
//! that only live in excluded categories never reach the dump.

use anyhow::Result;
use migration::layout::write_json;
use migration::{DataDir, EntryKind, Settings, Site};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use wordpress_client::WordPressClient;

use crate::cmd::Context;

fn entity_id(record: &Value) -> Option<u32> {
    record["id"].as_u64().and_then(|id| u32::try_from(id).ok())
}

/// Fetch the featured media URL and stamp it into the post. A post
/// without one, or one the media endpoint refuses to serve, is kept
/// as is.
async fn with_featured_media(client: &WordPressClient, mut post: Value) -> Value {
    let media_id = post["featured_media"].as_u64().unwrap_or(0);
    if media_id == 0 {
        warn!(
            "Post {} with category {} is missing the featured image",
            post["id"], post["categories"][0]
        );
        return post;
    }

    match client.media_item(media_id).await {
        Ok(media) => {
            if let Some(url) = media["guid"]["rendered"].as_str() {
                post["featured_media_url"] = Value::String(url.to_string());
            }
            post
        }
        Err(err) => {
            error!("Couldn't fetch featured image for post {}: {}", post["id"], err);
            post
        }
    }
}

fn write_dump(layout: &DataDir, site: Site, kind: EntryKind, records: &[Value]) -> Result<()> {
    for record in records {
        let Some(id) = entity_id(record) else {
            warn!("Skipping a {} record without an id", kind);
            continue;
        };
        let file = layout.dump_file(kind, site, u64::from(id));
        debug!("Outputting {} {} in {}", kind, id, file.display());
        write_json(&file, record)?;
    }
    Ok(())
}

pub async fn run(ctx: &Context) -> Result<()> {
    let settings = Settings::load(&ctx.settings)?;
    let layout = ctx.layout();
    layout.setup()?;

    let client = WordPressClient::new(&ctx.host, &ctx.lang, ctx.site.as_str());

    info!("Fetching categories...");
    let excluded = settings.excluded_categories(ctx.site, &ctx.lang);
    let categories: Vec<Value> = client
        .categories()
        .await?
        .into_iter()
        .filter(|category| entity_id(category).is_some_and(|id| !excluded.contains(&id)))
        .collect();
    info!("Retrieved {} categories", categories.len());

    info!("Fetching tags...");
    let tags = client.tags().await?;
    info!("Retrieved {} tags", tags.len());

    info!("Fetching posts...");
    let category_ids: Vec<u32> = categories.iter().filter_map(entity_id).collect();
    let fetched = client.posts(&category_ids).await?;
    let mut posts = Vec::with_capacity(fetched.len());
    for post in fetched {
        let mut post = with_featured_media(&client, post).await;
        post["site"] = Value::String(ctx.site.as_str().to_string());
        posts.push(post);
    }
    info!("Retrieved {} posts", posts.len());

    info!("Exporting categories...");
    write_dump(&layout, ctx.site, EntryKind::Category, &categories)?;
    info!("Exporting tags...");
    write_dump(&layout, ctx.site, EntryKind::Tag, &tags)?;
    info!("Exporting posts...");
    write_dump(&layout, ctx.site, EntryKind::Post, &posts)?;

    Ok(())
}
