//! Destination wire records.
//!
//! Compilers are plain constructors: every id they emit was resolved
//! ahead of time by the pipeline, so compiling never looks anything up
//! and never invents identity. Struct field order is serialization
//! order.

pub mod asset;
pub mod content_types;
pub mod entries;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use asset::{asset, asset_id, Asset};
pub use entries::{author, category, post, tag, CompiledEntry, PostArgs};

/// Destination field values are keyed by locale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Localized<T>(pub IndexMap<String, T>);

impl<T> Localized<T> {
    pub fn new(lang: &str, value: T) -> Self {
        let mut map = IndexMap::new();
        map.insert(lang.to_string(), value);
        Localized(map)
    }

    pub fn get(&self, lang: &str) -> Option<&T> {
        self.0.get(lang)
    }
}

/// `sys` envelope shared by entries and assets. `publishedVersion: 1`
/// makes the destination publish records as it imports them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sys {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Absent on some re-exported records; compilers always set 1.
    #[serde(rename = "publishedVersion", default)]
    pub published_version: u32,
    #[serde(
        rename = "contentType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_type: Option<LinkEnvelope>,
}

impl Sys {
    pub fn entry(id: impl Into<String>, content_type: &str) -> Self {
        Sys {
            id: id.into(),
            kind: "Entry".to_string(),
            published_version: 1,
            content_type: Some(LinkEnvelope::content_type(content_type)),
        }
    }

    pub fn asset(id: impl Into<String>) -> Self {
        Sys {
            id: id.into(),
            kind: "Asset".to_string(),
            published_version: 1,
            content_type: None,
        }
    }
}

/// `{"sys": {"type": "Link", ...}}` reference wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkEnvelope {
    pub sys: Link,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "linkType")]
    pub link_type: String,
    pub id: String,
}

impl LinkEnvelope {
    fn link(link_type: &str, id: impl Into<String>) -> Self {
        LinkEnvelope {
            sys: Link {
                kind: "Link".to_string(),
                link_type: link_type.to_string(),
                id: id.into(),
            },
        }
    }

    pub fn entry(id: impl Into<String>) -> Self {
        Self::link("Entry", id)
    }

    pub fn asset(id: impl Into<String>) -> Self {
        Self::link("Asset", id)
    }

    pub fn content_type(id: impl Into<String>) -> Self {
        Self::link("ContentType", id)
    }
}

/// A fresh destination sys.id.
pub fn new_sys_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
