//! Asset URL and internal link rewriting over transcoded Markdown.
//!
//! Bodies leave the transcoder still pointing at WordPress: upload URLs
//! on the source CDN and absolute links into `/{lang}/blog/...` or
//! `/{lang}/knowledge/...`. Both get rewritten here, after the asset
//! import has produced destination URLs to point at.

use indexmap::IndexMap;
use regex::{Captures, Regex};
use url::Url;

use crate::compile::asset::Asset;
use crate::error::{MigrateError, Result};

/// Resize/format query appended to every rewritten image URL.
pub const RESIZE_SUFFIX: &str = "?w=1232&fm=jpg&q=76&fl=progressive";

/// Normalize an upload URL to its protocol-relative CDN form, the form
/// both asset maps key on.
pub fn rewrite_with_cdn(url: &str) -> String {
    let rest = url
        .strip_prefix("https:")
        .or_else(|| url.strip_prefix("http:"))
        .unwrap_or(url);
    match rest.strip_prefix("//www.") {
        Some(tail) => format!("//cdn.{tail}"),
        None => rest.to_string(),
    }
}

/// Bare domain of the public site URL: `https://www.example.com` becomes
/// `example.com`.
pub fn source_domain(host: &str) -> Result<String> {
    let parsed = Url::parse(host).map_err(|_| MigrateError::InvalidHost {
        host: host.to_string(),
    })?;
    let domain = parsed.host_str().ok_or_else(|| MigrateError::InvalidHost {
        host: host.to_string(),
    })?;
    Ok(domain.strip_prefix("www.").unwrap_or(domain).to_string())
}

/// The two lookup tables chained while rewriting bodies: source CDN URL
/// to destination asset id (from the prepared payloads) and asset id to
/// destination URL (from the re-export written after the asset import).
#[derive(Debug, Default)]
pub struct AssetUrlMaps {
    source_url_to_id: IndexMap<String, String>,
    id_to_destination_url: IndexMap<String, String>,
}

impl AssetUrlMaps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build both tables in one pass over the two asset files.
    pub fn from_assets(prepared: &[Asset], exported: &[Asset], lang: &str) -> Self {
        let mut maps = AssetUrlMaps::new();
        for asset in prepared {
            if let Some(file) = asset.fields.file.get(lang) {
                maps.insert_source(file.url.clone(), asset.sys.id.clone());
            }
        }
        for asset in exported {
            if let Some(file) = asset.fields.file.get(lang) {
                maps.insert_destination(asset.sys.id.clone(), file.url.clone());
            }
        }
        maps
    }

    pub fn insert_source(&mut self, source_url: String, asset_id: String) {
        self.source_url_to_id.insert(source_url, asset_id);
    }

    pub fn insert_destination(&mut self, asset_id: String, destination_url: String) {
        self.id_to_destination_url.insert(asset_id, destination_url);
    }

    /// Asset id a source URL was imported under.
    pub fn asset_id(&self, source_url: &str) -> Option<&str> {
        self.source_url_to_id.get(source_url).map(String::as_str)
    }

    /// Full chain: source URL to destination URL.
    pub fn destination_url(&self, source_url: &str) -> Option<&str> {
        let id = self.source_url_to_id.get(source_url)?;
        self.id_to_destination_url.get(id).map(String::as_str)
    }
}

/// A rewritten body plus the asset URLs no map entry covered.
#[derive(Debug)]
pub struct RewriteOutcome {
    pub text: String,
    pub unresolved: Vec<String>,
}

/// Body rewriter bound to one source domain.
#[derive(Debug)]
pub struct LinkRewriter {
    image_pattern: Regex,
    post_link_pattern: Regex,
    discover_pattern: Regex,
}

impl LinkRewriter {
    /// `domain` is the bare site domain, e.g. `freeletics.com`; the
    /// patterns cover its `www` and `cdn` hosts.
    pub fn new(domain: &str) -> Self {
        let escaped = regex::escape(domain);
        let image_pattern = Regex::new(&format!(
            r"(?i)//(?:cdn|www)\.{escaped}/[a-zA-Z0-9\-_./]+\.(?:png|gif|jpg|jpeg)"
        ))
        .unwrap();
        let post_link_pattern = Regex::new(&format!(
            r"(?i)https://www\.{escaped}/([a-z]{{2}})/(?:blog|knowledge)/([a-zA-Z0-9\-_.]+)/\)"
        ))
        .unwrap();
        let discover_pattern = Regex::new(&format!(
            r#"(?i)src="(https?://(?:cdn|www)\.{escaped}/[a-zA-Z0-9\-_./]+/wp-content/uploads/sites/[a-zA-Z0-9\-_./]+\.(?:png|gif|jpg|jpeg))""#
        ))
        .unwrap();
        LinkRewriter {
            image_pattern,
            post_link_pattern,
            discover_pattern,
        }
    }

    /// Rewriter for the host URL the CLI was given.
    pub fn for_host(host: &str) -> Result<Self> {
        Ok(LinkRewriter::new(&source_domain(host)?))
    }

    /// Swap every source image URL for its destination URL plus the
    /// resize suffix. URLs the maps cannot resolve stay untouched and
    /// are reported back instead of failing the run.
    pub fn rewrite_asset_urls(&self, text: &str, maps: &AssetUrlMaps) -> RewriteOutcome {
        let mut unresolved = Vec::new();
        let rewritten = self
            .image_pattern
            .replace_all(text, |caps: &Captures| {
                let source = &caps[0];
                match maps.destination_url(&rewrite_with_cdn(source)) {
                    Some(destination) => format!("{destination}{RESIZE_SUFFIX}"),
                    None => {
                        unresolved.push(source.to_string());
                        source.to_string()
                    }
                }
            })
            .to_string();
        RewriteOutcome {
            text: rewritten,
            unresolved,
        }
    }

    /// Point Markdown links at the merged destination path space:
    /// `/{lang}/blog/...` and `/{lang}/knowledge/...` both become
    /// `/{lang}/blog/posts/{slug}/`. The trailing `/)` anchors the
    /// pattern inside Markdown link syntax.
    pub fn rewrite_post_links(&self, text: &str) -> String {
        self.post_link_pattern
            .replace_all(text, "/$1/blog/posts/$2/)")
            .to_string()
    }

    /// Upload URLs referenced by an HTML body, in document order.
    pub fn discover_asset_urls(&self, html: &str) -> Vec<String> {
        self.discover_pattern
            .captures_iter(html)
            .map(|caps| caps[1].to_string())
            .collect()
    }
}
