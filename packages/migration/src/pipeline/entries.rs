//! The prepare entries step: dumped records in, import payload out.
//!
//! Runs after `prepare assets` and `import assets`, because rewriting
//! bodies needs both asset files on disk. Produces `entries.json` with
//! authors, categories, tags and posts in that order, plus the
//! `rewrite.csv` redirect table.

use tracing::{info, warn};

use crate::compile::{self, new_sys_id, Asset, CompiledEntry, PostArgs};
use crate::error::{MigrateError, Result};
use crate::html::{html_to_markdown, sanitize_string};
use crate::layout::{read_json, write_json, write_string, DataDir};
use crate::redirects::RewriteTable;
use crate::resolver::{
    remap_entry_id, resolve_term_ref, source_term_id, RemapOrigin, TaxonomyIndex,
};
use crate::rewrite::{rewrite_with_cdn, AssetUrlMaps, LinkRewriter};
use crate::types::entry::{load_dump_dir, Category, EntryKind, Post, SourceEntity, Tag};
use crate::types::id::EntryId;
use crate::types::settings::Settings;
use crate::types::site::Site;

/// What one prepare entries run produced.
#[derive(Debug, Default)]
pub struct PrepareSummary {
    pub authors: usize,
    pub categories: usize,
    pub tags: usize,
    pub posts: usize,
    /// Posts that could not be linked to a source-language counterpart
    /// and kept their own id.
    pub orphaned: usize,
    pub rewrite_rows: usize,
    /// Source asset URLs no map entry covered, deduplicated.
    pub unresolved_assets: Vec<String>,
}

/// Fold one knowledge term onto the blog term its remap row names.
fn fold_cross_site<E: SourceEntity>(
    settings: &Settings,
    index: &mut TaxonomyIndex,
    term: &E,
) -> Result<()> {
    let source_id = source_term_id(term, &settings.source.lang)?;
    let kind = index.kind();
    let remapped = settings
        .prepare
        .remap
        .table(kind)
        .and_then(|table| table.get(&source_id))
        .copied()
        .ok_or(MigrateError::MissingCrossSiteRemap {
            site: term.site(),
            kind,
            id: source_id,
        })?;
    index.fold_knowledge(remapped)
}

/// Compile every dumped record of one language into the combined
/// entries payload, rewriting bodies against the asset maps on disk.
pub fn prepare_entries(
    settings: &Settings,
    layout: &DataDir,
    lang: &str,
    host: &str,
) -> Result<PrepareSummary> {
    let prepared_assets: Vec<Asset> = read_json(&layout.assets_file())?;
    let exported_assets: Vec<Asset> = read_json(&layout.exported_assets_file())?;
    let asset_maps = AssetUrlMaps::from_assets(&prepared_assets, &exported_assets, lang);
    let rewriter = LinkRewriter::for_host(host)?;

    let mut compiled: Vec<CompiledEntry> = Vec::new();
    let mut rewrites = RewriteTable::new();
    let mut unresolved = indexmap::IndexSet::new();
    let mut summary = PrepareSummary::default();

    // Authors come from settings, numbered from 1 under the source
    // space code. Posts link the first one.
    info!("Preparing {} Author entries", settings.prepare.authors.len());
    let mut author_sys_ids = Vec::new();
    for (n, name) in (1u32..).zip(&settings.prepare.authors) {
        let author_id = EntryId::generate(settings.source_code()?, Site::Blog, n);
        let sys_id = new_sys_id();
        author_sys_ids.push(sys_id.clone());
        compiled.push(CompiledEntry::Author(compile::author(
            lang,
            sys_id,
            author_id,
            sanitize_string(name),
        )));
    }
    summary.authors = author_sys_ids.len();
    let lead_author = author_sys_ids.first().ok_or(MigrateError::MissingAuthors)?;

    // Categories: compile the blog side, then fold knowledge terms onto
    // the blog entries their remap rows name.
    let categories: Vec<Category> = load_dump_dir(&layout.dump_entries(EntryKind::Category))?
        .into_iter()
        .filter(|category: &Category| {
            !settings
                .excluded_categories(category.site, lang)
                .contains(&category.id)
        })
        .collect();
    info!("Preparing {} Category entries", categories.len());

    let mut category_index = TaxonomyIndex::for_kind(EntryKind::Category);
    for category in categories.iter().filter(|c| c.site == Site::Blog) {
        let sys_id = new_sys_id();
        let source_id = source_term_id(category, &settings.source.lang)?;
        let remapped = remap_entry_id(settings, lang, category)?;
        let slug = sanitize_string(&category.slug);

        rewrites.push(
            category.link.clone(),
            format!("{host}/{lang}/blog/categories/{slug}/"),
        );
        category_index.insert_blog(source_id, sys_id.clone());

        compiled.push(CompiledEntry::Category(compile::category(
            lang,
            sys_id,
            remapped.id,
            sanitize_string(&category.name),
            slug,
            sanitize_string(&category.description),
        )));
        summary.categories += 1;
    }
    for category in categories.iter().filter(|c| c.site != Site::Blog) {
        fold_cross_site(settings, &mut category_index, category)?;
    }

    // Tags follow the same two passes, without exclusions or redirects.
    let tags: Vec<Tag> = load_dump_dir(&layout.dump_entries(EntryKind::Tag))?;
    info!("Preparing {} Tag entries", tags.len());

    let mut tag_index = TaxonomyIndex::for_kind(EntryKind::Tag);
    for tag in tags.iter().filter(|t| t.site == Site::Blog) {
        let sys_id = new_sys_id();
        let source_id = source_term_id(tag, &settings.source.lang)?;
        let remapped = remap_entry_id(settings, lang, tag)?;
        let slug = sanitize_string(&tag.slug);

        tag_index.insert_blog(source_id, sys_id.clone());

        compiled.push(CompiledEntry::Tag(compile::tag(
            lang,
            sys_id,
            remapped.id,
            sanitize_string(&tag.name),
            slug,
        )));
        summary.tags += 1;
    }
    for tag in tags.iter().filter(|t| t.site != Site::Blog) {
        fold_cross_site(settings, &mut tag_index, tag)?;
    }

    // Posts: skipped entirely when their primary category is excluded.
    let posts: Vec<Post> = load_dump_dir(&layout.dump_entries(EntryKind::Post))?
        .into_iter()
        .filter(|post: &Post| {
            !post.categories.first().is_some_and(|id| {
                settings
                    .excluded_categories(post.site, lang)
                    .contains(id)
            })
        })
        .collect();
    info!("Preparing {} Post entries", posts.len());

    for post in &posts {
        let remapped = remap_entry_id(settings, lang, post)?;
        if remapped.origin == RemapOrigin::Orphan {
            warn!(
                "Post \"{}/{}.json\" couldn't be linked to any source",
                post.site, post.id
            );
            summary.orphaned += 1;
        }

        let category_sys_id = match post.categories.first() {
            Some(term_id) => Some(resolve_term_ref(
                settings,
                &category_index,
                &categories,
                post.site,
                post.id,
                *term_id,
            )?),
            None => None,
        };
        let tag_sys_ids = post
            .tags
            .iter()
            .map(|term_id| {
                resolve_term_ref(settings, &tag_index, &tags, post.site, post.id, *term_id)
            })
            .collect::<Result<Vec<String>>>()?;

        let featured_image_id = match post.featured_media_url.as_deref() {
            Some(url) => {
                let normalized = rewrite_with_cdn(url);
                match asset_maps.asset_id(&normalized) {
                    Some(id) => Some(id.to_string()),
                    None => {
                        warn!("No imported asset for featured image {} of post {}", url, post.id);
                        unresolved.insert(normalized);
                        None
                    }
                }
            }
            None => None,
        };

        let markdown = html_to_markdown(post.body_html());
        let outcome = rewriter.rewrite_asset_urls(&markdown, &asset_maps);
        for url in outcome.unresolved {
            warn!("No imported asset for {} in post {}", url, post.id);
            unresolved.insert(rewrite_with_cdn(&url));
        }
        let body = rewriter.rewrite_post_links(&outcome.text);

        let slug = sanitize_string(&post.slug);
        rewrites.push(
            post.link.clone(),
            format!("{host}/{lang}/blog/posts/{slug}/"),
        );

        compiled.push(CompiledEntry::Post(compile::post(
            lang,
            PostArgs {
                sys_id: new_sys_id(),
                post_id: remapped.id,
                title: sanitize_string(&post.title.rendered),
                slug,
                description: sanitize_string(&post.yoast_meta.description),
                featured_image_id,
                body,
                author_sys_id: lead_author.clone(),
                category_sys_id,
                tag_sys_ids,
                published_on: post.date_gmt.date(),
            },
        )));
        summary.posts += 1;
    }

    info!(
        "Exporting {} entries and {} URL rewrites",
        compiled.len(),
        rewrites.len()
    );
    write_json(&layout.entries_file(), &compiled)?;
    write_string(&layout.rewrite_file(), &rewrites.to_csv())?;

    summary.rewrite_rows = rewrites.len();
    summary.unresolved_assets = unresolved.into_iter().collect();
    Ok(summary)
}
