//! Dumped WordPress records and their on-disk representation.
//!
//! Dump files are named `{site}-{id}.json` and hold the REST API
//! response verbatim. The loader stamps the filename's site prefix into
//! the record before the typed parse, so the filename stays the source
//! of truth even for dumps written by older exporters.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MigrateError, Result};
use crate::types::site::Site;

/// Kind of WordPress record a dump file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Post,
    Category,
    Tag,
}

impl EntryKind {
    /// Directory name under `dump/entries/`.
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Post => "post",
            EntryKind::Category => "category",
            EntryKind::Tag => "tag",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cross-language link attached by the multilingual plugin.
///
/// The foreign-id key depends on the record kind, so all three are
/// optional and [`TranslationLink::foreign_id`] picks the right one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationLink {
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<u32>,
}

impl TranslationLink {
    pub fn foreign_id(&self, kind: EntryKind) -> Option<u32> {
        match kind {
            EntryKind::Post => self.post_id,
            EntryKind::Category => self.category_id,
            EntryKind::Tag => self.tag_id,
        }
    }
}

/// Rendered text as the WP REST API ships it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

/// SEO metadata attached by the Yoast plugin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YoastMeta {
    #[serde(default, rename = "yoast_wpseo_metadesc")]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub site: Site,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub mlp_translations: Vec<TranslationLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: u32,
    pub site: Site,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub mlp_translations: Vec<TranslationLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: u32,
    pub site: Site,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub link: String,
    pub date_gmt: NaiveDateTime,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default)]
    pub content: Rendered,
    #[serde(default)]
    pub categories: Vec<u32>,
    #[serde(default)]
    pub tags: Vec<u32>,
    /// Stamped by the exporter from the media endpoint; absent when the
    /// post has no featured media or the media fetch failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_media_url: Option<String>,
    /// ACF field; `false` when unset, so kept untyped.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub image_landscape: Value,
    /// Knowledge-site body from the flexible-content plugin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields_content: Option<String>,
    #[serde(default)]
    pub yoast_meta: YoastMeta,
    #[serde(default)]
    pub mlp_translations: Vec<TranslationLink>,
}

impl Post {
    /// The HTML body the transcoder works from. Knowledge posts carry
    /// their real body in the flexible-content field.
    pub fn body_html(&self) -> &str {
        match self.site {
            Site::Knowledge => self
                .custom_fields_content
                .as_deref()
                .unwrap_or(&self.content.rendered),
            Site::Blog => &self.content.rendered,
        }
    }

    /// First image of the ACF landscape field, when present.
    pub fn landscape_image_url(&self) -> Option<&str> {
        self.image_landscape.get(0).and_then(Value::as_str)
    }
}

/// Common surface of the three record kinds used by id remapping.
pub trait SourceEntity {
    fn id(&self) -> u32;
    fn site(&self) -> Site;
    fn kind(&self) -> EntryKind;
    fn translations(&self) -> &[TranslationLink];
}

macro_rules! impl_source_entity {
    ($ty:ty, $kind:expr) => {
        impl SourceEntity for $ty {
            fn id(&self) -> u32 {
                self.id
            }
            fn site(&self) -> Site {
                self.site
            }
            fn kind(&self) -> EntryKind {
                $kind
            }
            fn translations(&self) -> &[TranslationLink] {
                &self.mlp_translations
            }
        }
    };
}

impl_source_entity!(Post, EntryKind::Post);
impl_source_entity!(Category, EntryKind::Category);
impl_source_entity!(Tag, EntryKind::Tag);

/// Site tag from a dump filename like `blog-123.json`.
pub fn site_from_filename(path: &Path) -> Result<Site> {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let prefix = stem.split('-').next().unwrap_or_default();
    prefix
        .parse()
        .map_err(|_| MigrateError::InvalidDumpFilename {
            path: path.to_path_buf(),
        })
}

/// Read one dump file, stamping the filename's site into the record.
pub fn load_dump_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let site = site_from_filename(path)?;
    let raw = fs::read(path).map_err(|source| MigrateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut value: Value =
        serde_json::from_slice(&raw).map_err(|source| MigrateError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    if let Value::Object(map) = &mut value {
        map.insert("site".to_string(), Value::String(site.as_str().to_string()));
    }
    serde_json::from_value(value).map_err(|source| MigrateError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read every `.json` dump in a directory, ordered by site then id so a
/// run processes records in the same order regardless of filesystem.
pub fn load_dump_dir<T>(dir: &Path) -> Result<Vec<T>>
where
    T: DeserializeOwned + SourceEntity,
{
    let listing = fs::read_dir(dir).map_err(|source| MigrateError::Read {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut records: Vec<T> = Vec::new();
    for dirent in listing {
        let dirent = dirent.map_err(|source| MigrateError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dirent.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        records.push(load_dump_file(&path)?);
    }
    records.sort_by_key(|r| (r.site().as_str(), r.id()));
    Ok(records)
}
