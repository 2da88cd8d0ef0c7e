//! Pure WordPress REST API client.
//!
//! A minimal read-only client for the WP REST v2 API as exposed by a
//! multisite install with per-language, per-site path prefixes:
//! `{host}/{lang}/{site}/wp-json/wp/v2/...`. Records come back as raw
//! JSON values so callers can dump them verbatim.
//!
//! # Example
//!
//! ```rust,ignore
//! use wordpress_client::WordPressClient;
//!
//! let wp = WordPressClient::new("https://www.freeletics.com", "en", "blog");
//!
//! let categories = wp.categories().await?;
//! let posts = wp.posts(&[2, 7]).await?;
//! ```

pub mod error;

pub use error::{Result, WordPressError};

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Records fetched per page; the API maximum.
const PER_PAGE: usize = 100;

/// Bound on full pages per listing, against a source that never sends a
/// short one.
const MAX_PAGES: usize = 1000;

pub struct WordPressClient {
    client: reqwest::Client,
    base_url: String,
}

impl WordPressClient {
    /// `host` is the public site URL, e.g. `https://www.freeletics.com`.
    pub fn new(host: &str, lang: &str, site: &str) -> Self {
        let host = host.trim_end_matches('/');
        tracing::info!("Create connection with {}/{}/{}/wp-json", host, lang, site);

        Self {
            client: reqwest::Client::new(),
            base_url: format!("{host}/{lang}/{site}/wp-json/wp/v2"),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(WordPressError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }

    /// Fetch every record of a list endpoint, page by page. The loop
    /// ends on the first short page.
    async fn fetch_all(&self, resource: &str, query: &str) -> Result<Vec<Value>> {
        let mut records = Vec::new();
        for page in 0..MAX_PAGES {
            let offset = page * PER_PAGE;
            let url = format!(
                "{}/{resource}?per_page={PER_PAGE}&offset={offset}{query}",
                self.base_url
            );
            let batch: Vec<Value> = self.fetch(&url).await?;

            let full_page = batch.len() == PER_PAGE;
            records.extend(batch);
            if !full_page {
                tracing::debug!("Fetched {} records from /{}", records.len(), resource);
                return Ok(records);
            }
        }

        Err(WordPressError::MaxPagesExceeded {
            resource: resource.to_string(),
            pages: MAX_PAGES,
        })
    }

    pub async fn categories(&self) -> Result<Vec<Value>> {
        self.fetch_all("categories", "").await
    }

    pub async fn tags(&self) -> Result<Vec<Value>> {
        self.fetch_all("tags", "").await
    }

    /// Posts belonging to any of the given categories; every post when
    /// the list is empty.
    pub async fn posts(&self, category_ids: &[u32]) -> Result<Vec<Value>> {
        let query = if category_ids.is_empty() {
            String::new()
        } else {
            let ids = category_ids
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(",");
            format!("&categories={ids}")
        };
        self.fetch_all("posts", &query).await
    }

    /// One media record, used to resolve featured images.
    pub async fn media_item(&self, id: u64) -> Result<Value> {
        let url = format!("{}/media/{id}", self.base_url);
        self.fetch(&url).await
    }
}
