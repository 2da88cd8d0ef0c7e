//! Create and delete destination spaces.
//!
//! `create` writes the space id to a config file under
//! `config/spaces/` and activates the content types; every import
//! reads the space id back from that file.

use std::path::Path;

use anyhow::{bail, Result};
use contentful_client::ContentfulClient;
use migration::{content_types, SpaceConfig, DEFAULT_SPACE_CONFIG_DIR};
use tracing::info;

use crate::cmd::Context;

pub async fn create(ctx: &Context) -> Result<()> {
    let config_dir = Path::new(DEFAULT_SPACE_CONFIG_DIR);
    if SpaceConfig::exists(config_dir, ctx.site, &ctx.lang) {
        bail!(
            "Space already exists for site {} and lang {}",
            ctx.site,
            ctx.lang
        );
    }

    let client = ContentfulClient::from_env()?;

    info!("Creating space for site {} and lang {}", ctx.site, ctx.lang);
    let space = client
        .create_space(&format!("{}/{}", ctx.site, ctx.lang), &ctx.lang)
        .await?;

    let config = SpaceConfig {
        id: space.sys.id.clone(),
        name: space.name,
        lang: ctx.lang.clone(),
    };
    config.save(config_dir, ctx.site)?;

    info!("Creating contentTypes for space {}", space.sys.id);
    client
        .import_content_types(&space.sys.id, &content_types(&space.sys.id))
        .await?;

    Ok(())
}

pub async fn delete(ctx: &Context) -> Result<()> {
    let config_dir = Path::new(DEFAULT_SPACE_CONFIG_DIR);
    let config = SpaceConfig::load(config_dir, ctx.site, &ctx.lang)?;

    let client = ContentfulClient::from_env()?;

    info!(
        "Deleting space {} for site {} and lang {}",
        config.id, ctx.site, ctx.lang
    );
    client.delete_space(&config.id).await?;
    SpaceConfig::remove(config_dir, ctx.site, &ctx.lang)?;

    Ok(())
}
