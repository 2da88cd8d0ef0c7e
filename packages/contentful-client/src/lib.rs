//! Pure Contentful Management API client.
//!
//! Covers the slice of the management API a content migration needs:
//! space creation and deletion, content type activation, entry and
//! asset upserts with publish, and asset listing. Record payloads are
//! raw JSON values compiled elsewhere; the client only reads the
//! `sys` fields it needs to address and version them.
//!
//! # Example
//!
//! ```rust,ignore
//! use contentful_client::ContentfulClient;
//!
//! let client = ContentfulClient::from_env()?;
//!
//! let space = client.create_space("blog/de", "de").await?;
//! client.import_entries(&space.sys.id, &entries).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{ContentfulError, Result};
pub use types::{Collection, SpaceData, SysData};

use std::time::Duration;

use serde_json::{json, Value};

const BASE_URL: &str = "https://api.contentful.com";
const MANAGEMENT_CONTENT_TYPE: &str = "application/vnd.contentful.management.v1+json";

/// Page size when listing assets back out of a space.
const EXPORT_PAGE_SIZE: usize = 100;

/// Bound on listing pages.
const MAX_PAGES: usize = 1000;

/// How long to wait for the backend to process an uploaded file.
const PROCESS_POLL_ATTEMPTS: usize = 30;
const PROCESS_POLL_DELAY: Duration = Duration::from_secs(1);

fn sys_id(record: &Value) -> Result<&str> {
    record["sys"]["id"]
        .as_str()
        .ok_or(ContentfulError::MissingRecordId)
}

fn sys_version(record: &Value) -> u64 {
    record["sys"]["version"].as_u64().unwrap_or(1)
}

pub struct ContentfulClient {
    client: reqwest::Client,
    token: String,
    organization_id: Option<String>,
}

impl ContentfulClient {
    pub fn new(token: String, organization_id: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            organization_id,
        }
    }

    /// Build from `CONTENTFUL_MANAGEMENT_TOKEN` and the optional
    /// `CONTENTFUL_ORGANIZATION_ID`.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("CONTENTFUL_MANAGEMENT_TOKEN")
            .map_err(|_| ContentfulError::MissingToken)?;
        let organization_id = std::env::var("CONTENTFUL_ORGANIZATION_ID").ok();
        Ok(Self::new(token, organization_id))
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ContentfulError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp)
    }

    async fn get(&self, url: &str) -> Result<Value> {
        let resp = self.client.get(url).bearer_auth(&self.token).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn put(&self, url: &str, body: &Value, headers: &[(&str, String)]) -> Result<Value> {
        let mut req = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .header("Content-Type", MANAGEMENT_CONTENT_TYPE)
            .json(body);
        for (name, value) in headers {
            req = req.header(*name, value);
        }
        Ok(Self::check(req.send().await?).await?.json().await?)
    }

    /// Versioned PUT with no request body: the publish and process
    /// calls. Some of them return no response body either.
    async fn put_action(&self, url: &str, version: u64) -> Result<()> {
        let resp = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .header("X-Contentful-Version", version.to_string())
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Create a space under the configured organization.
    pub async fn create_space(&self, name: &str, default_locale: &str) -> Result<SpaceData> {
        let mut req = self
            .client
            .post(format!("{BASE_URL}/spaces"))
            .bearer_auth(&self.token)
            .header("Content-Type", MANAGEMENT_CONTENT_TYPE)
            .json(&json!({"name": name, "defaultLocale": default_locale}));
        if let Some(org) = &self.organization_id {
            req = req.header("X-Contentful-Organization", org);
        }

        Ok(Self::check(req.send().await?).await?.json().await?)
    }

    pub async fn delete_space(&self, space_id: &str) -> Result<()> {
        let resp = self
            .client
            .delete(format!("{BASE_URL}/spaces/{space_id}"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Create and activate content types in a fresh space.
    pub async fn import_content_types(
        &self,
        space_id: &str,
        content_types: &[Value],
    ) -> Result<()> {
        for content_type in content_types {
            let id = sys_id(content_type)?;
            tracing::info!(space_id, content_type = id, "Creating content type");

            let body = json!({
                "name": content_type["name"],
                "description": content_type["description"],
                "displayField": content_type["displayField"],
                "fields": content_type["fields"],
            });
            let created = self
                .put(
                    &format!("{BASE_URL}/spaces/{space_id}/content_types/{id}"),
                    &body,
                    &[],
                )
                .await?;

            self.put_action(
                &format!("{BASE_URL}/spaces/{space_id}/content_types/{id}/published"),
                sys_version(&created),
            )
            .await?;
        }
        Ok(())
    }

    /// Upsert and publish compiled entries. Each record must carry its
    /// `sys.id` and `sys.contentType` link.
    pub async fn import_entries(&self, space_id: &str, entries: &[Value]) -> Result<()> {
        for entry in entries {
            let id = sys_id(entry)?;
            let content_type = entry["sys"]["contentType"]["sys"]["id"]
                .as_str()
                .ok_or_else(|| ContentfulError::MissingContentType { id: id.to_string() })?;

            let created = self
                .put(
                    &format!("{BASE_URL}/spaces/{space_id}/entries/{id}"),
                    &json!({"fields": entry["fields"]}),
                    &[("X-Contentful-Content-Type", content_type.to_string())],
                )
                .await?;

            self.put_action(
                &format!("{BASE_URL}/spaces/{space_id}/entries/{id}/published"),
                sys_version(&created),
            )
            .await?;
        }
        tracing::info!(space_id, count = entries.len(), "Published entries");
        Ok(())
    }

    /// Upsert compiled assets, let the backend fetch and process each
    /// file, then publish.
    pub async fn import_assets(&self, space_id: &str, assets: &[Value]) -> Result<()> {
        for asset in assets {
            let id = sys_id(asset)?.to_string();

            let created = self
                .put(
                    &format!("{BASE_URL}/spaces/{space_id}/assets/{id}"),
                    &json!({"fields": asset["fields"]}),
                    &[],
                )
                .await?;

            let locales: Vec<String> = asset["fields"]["file"]
                .as_object()
                .map(|file| file.keys().cloned().collect())
                .unwrap_or_default();
            let mut version = sys_version(&created);
            for locale in &locales {
                self.put_action(
                    &format!(
                        "{BASE_URL}/spaces/{space_id}/assets/{id}/files/{locale}/process"
                    ),
                    version,
                )
                .await?;
                let processed = self.wait_for_processing(space_id, &id, locale).await?;
                version = sys_version(&processed);
            }

            self.put_action(
                &format!("{BASE_URL}/spaces/{space_id}/assets/{id}/published"),
                version,
            )
            .await?;
        }
        tracing::info!(space_id, count = assets.len(), "Published assets");
        Ok(())
    }

    /// Poll an asset until the backend has materialized a file URL for
    /// the locale.
    async fn wait_for_processing(
        &self,
        space_id: &str,
        asset_id: &str,
        locale: &str,
    ) -> Result<Value> {
        for _ in 0..PROCESS_POLL_ATTEMPTS {
            let asset = self
                .get(&format!("{BASE_URL}/spaces/{space_id}/assets/{asset_id}"))
                .await?;
            if asset["fields"]["file"][locale]["url"].is_string() {
                return Ok(asset);
            }
            tracing::debug!(asset_id, locale, "Asset still processing");
            tokio::time::sleep(PROCESS_POLL_DELAY).await;
        }
        Err(ContentfulError::ProcessingTimeout {
            asset_id: asset_id.to_string(),
            attempts: PROCESS_POLL_ATTEMPTS,
        })
    }

    /// Every asset in a space, with the URLs the backend assigned. The
    /// loop ends on the first short page.
    pub async fn export_assets(&self, space_id: &str) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        for page in 0..MAX_PAGES {
            let skip = page * EXPORT_PAGE_SIZE;
            let value = self
                .get(&format!(
                    "{BASE_URL}/spaces/{space_id}/assets?skip={skip}&limit={EXPORT_PAGE_SIZE}"
                ))
                .await?;
            let collection: Collection = serde_json::from_value(value)?;

            let full_page = collection.items.len() == EXPORT_PAGE_SIZE;
            items.extend(collection.items);
            if !full_page {
                tracing::info!(space_id, count = items.len(), "Exported assets");
                return Ok(items);
            }
        }

        Err(ContentfulError::MaxPagesExceeded {
            resource: format!("/spaces/{space_id}/assets"),
            pages: MAX_PAGES,
        })
    }
}
