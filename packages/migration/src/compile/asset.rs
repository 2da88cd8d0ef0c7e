//! Asset payloads and deterministic asset ids.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::compile::{Localized, Sys};

/// One destination asset. The same shape covers both directions: the
/// payload `prepare assets` compiles (with the source URL) and the
/// records the destination hands back after import (with its own URL).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub sys: Sys,
    pub fields: AssetFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetFields {
    pub title: Localized<String>,
    pub file: Localized<FileData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileData {
    #[serde(default)]
    pub url: String,
    #[serde(rename = "fileName", default)]
    pub file_name: String,
    #[serde(rename = "contentType", default)]
    pub content_type: String,
}

/// Deterministic asset id derived from the normalized URL, so re-runs
/// address the same destination asset instead of minting a duplicate.
pub fn asset_id(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = hasher.finalize();
    digest[..10].iter().map(|b| format!("{b:02x}")).collect()
}

/// Compile one asset payload from its CDN-normalized source URL.
pub fn asset(lang: &str, sys_id: String, url: String) -> Asset {
    let file_name = url.rsplit('/').next().unwrap_or("").to_string();
    let (stem, extension) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext.to_lowercase()),
        None => (file_name.as_str(), String::from("jpeg")),
    };
    let media_type = if extension == "jpg" {
        "jpeg".to_string()
    } else {
        extension
    };
    let title = stem
        .chars()
        .map(|c| if matches!(c, '-' | '_' | '.') { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string();

    Asset {
        sys: Sys::asset(sys_id),
        fields: AssetFields {
            title: Localized::new(lang, title),
            file: Localized::new(
                lang,
                FileData {
                    url: url.clone(),
                    file_name,
                    content_type: format!("image/{media_type}"),
                },
            ),
        },
    }
}
