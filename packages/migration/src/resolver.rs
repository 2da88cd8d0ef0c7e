//! Identity collapse across languages and the cross-site taxonomy index.
//!
//! Every record's destination id is derived from its source-language
//! counterpart, so the per-language spaces agree on which entry is
//! "the same" one. Knowledge taxonomy additionally folds onto blog
//! taxonomy through the remap tables in settings.

use indexmap::IndexMap;

use crate::error::{MigrateError, Result};
use crate::types::entry::{EntryKind, SourceEntity, TranslationLink};
use crate::types::id::EntryId;
use crate::types::settings::Settings;
use crate::types::site::Site;

/// Translation link pointing at the source-language counterpart.
pub fn source_translation<'a, E: SourceEntity>(
    entity: &'a E,
    source_lang: &str,
) -> Option<&'a TranslationLink> {
    entity.translations().iter().find(|t| t.lang == source_lang)
}

/// Source-language id of a taxonomy term.
///
/// Terms are keyed by this id everywhere, so a term without a source
/// counterpart is unusable and the run must stop.
pub fn source_term_id<E: SourceEntity>(entity: &E, source_lang: &str) -> Result<u32> {
    source_translation(entity, source_lang)
        .and_then(|link| link.foreign_id(entity.kind()))
        .ok_or_else(|| MigrateError::MissingSourceTranslation {
            site: entity.site(),
            kind: entity.kind(),
            id: entity.id(),
        })
}

/// How a remapped id was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemapOrigin {
    /// Run language is the source language; the record keeps its own id.
    SourceLocale,
    /// Collapsed onto the source-language counterpart.
    Translation,
    /// No source counterpart; the record becomes its own source.
    Orphan,
}

#[derive(Debug, Clone)]
pub struct Remapped {
    pub id: EntryId,
    pub origin: RemapOrigin,
}

/// Destination id of a record, collapsed onto its source counterpart.
///
/// Source-language runs keep local ids. Other runs adopt the id the
/// source-language counterpart would generate; records without one fall
/// back to their own id and the caller decides how loudly to complain.
pub fn remap_entry_id<E: SourceEntity>(
    settings: &Settings,
    lang: &str,
    entity: &E,
) -> Result<Remapped> {
    if lang == settings.source.lang {
        return Ok(Remapped {
            id: EntryId::generate(settings.code_for(lang)?, entity.site(), entity.id()),
            origin: RemapOrigin::SourceLocale,
        });
    }

    if let Some(foreign) = source_translation(entity, &settings.source.lang)
        .and_then(|link| link.foreign_id(entity.kind()))
    {
        return Ok(Remapped {
            id: EntryId::generate(settings.source_code()?, entity.site(), foreign),
            origin: RemapOrigin::Translation,
        });
    }

    Ok(Remapped {
        id: EntryId::generate(settings.code_for(lang)?, entity.site(), entity.id()),
        origin: RemapOrigin::Orphan,
    })
}

/// Destination sys.ids of compiled taxonomy entries, keyed the way posts
/// reference them after source-language mapping.
///
/// Blog terms register under their source-language id. Knowledge terms
/// fold onto already-registered blog terms, which is why folding takes
/// the finished blog side for granted: build order is blog first, by
/// construction.
#[derive(Debug)]
pub struct TaxonomyIndex {
    kind: EntryKind,
    blog: IndexMap<u32, String>,
    knowledge: IndexMap<u32, String>,
}

impl TaxonomyIndex {
    pub fn for_kind(kind: EntryKind) -> Self {
        TaxonomyIndex {
            kind,
            blog: IndexMap::new(),
            knowledge: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Register a compiled blog term under its source-language id.
    pub fn insert_blog(&mut self, source_id: u32, sys_id: String) {
        self.blog.insert(source_id, sys_id);
    }

    /// Fold a knowledge term onto the blog entry its remap row names.
    pub fn fold_knowledge(&mut self, remapped_id: u32) -> Result<()> {
        let sys_id = self
            .blog
            .get(&remapped_id)
            .cloned()
            .ok_or(MigrateError::UnmappedTaxonomy {
                kind: self.kind,
                id: remapped_id,
            })?;
        self.knowledge.insert(remapped_id, sys_id);
        Ok(())
    }

    /// Destination sys.id under a mapped source id, per referencing site.
    pub fn resolve(&self, site: Site, mapped_id: u32) -> Option<&str> {
        let map = match site {
            Site::Blog => &self.blog,
            Site::Knowledge => &self.knowledge,
        };
        map.get(&mapped_id).map(String::as_str)
    }
}

/// Destination sys.id of one term reference on a post.
///
/// Every hop that can fail names the id it failed on: the term must be
/// in the dump, must link a source-language counterpart, knowledge terms
/// must have a remap row, and the mapped id must belong to a compiled
/// blog term.
pub fn resolve_term_ref<E: SourceEntity>(
    settings: &Settings,
    index: &TaxonomyIndex,
    terms: &[E],
    post_site: Site,
    post_id: u32,
    term_id: u32,
) -> Result<String> {
    let kind = index.kind();
    let term = terms
        .iter()
        .find(|t| t.site() == post_site && t.id() == term_id)
        .ok_or(MigrateError::UnknownReference {
            site: post_site,
            post: post_id,
            kind,
            id: term_id,
        })?;
    let source_id = source_term_id(term, &settings.source.lang)?;
    let mapped = match post_site {
        Site::Blog => source_id,
        Site::Knowledge => settings
            .prepare
            .remap
            .table(kind)
            .and_then(|table| table.get(&source_id))
            .copied()
            .ok_or(MigrateError::MissingCrossSiteRemap {
                site: post_site,
                kind,
                id: source_id,
            })?,
    };
    index
        .resolve(post_site, mapped)
        .map(str::to_string)
        .ok_or(MigrateError::UnmappedTaxonomy { kind, id: mapped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::entry::Post;

    fn settings() -> Settings {
        serde_json::from_value(serde_json::json!({
            "source": {"lang": "en"},
            "prepare": {
                "spaces": {"codes": {"en": 3, "de": 5}},
                "remap": {"categories": {"70": 2}},
                "authors": ["Robin Mark"]
            }
        }))
        .unwrap()
    }

    fn post(site: &str, id: u32, translations: serde_json::Value) -> Post {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "site": site,
            "date_gmt": "2018-01-12T09:30:00",
            "mlp_translations": translations,
        }))
        .unwrap()
    }

    #[test]
    fn source_language_run_keeps_local_id() {
        let entity = post("blog", 9, serde_json::json!([]));
        let remapped = remap_entry_id(&settings(), "en", &entity).unwrap();
        assert_eq!(remapped.id.as_str(), "03100009");
        assert_eq!(remapped.origin, RemapOrigin::SourceLocale);
    }

    #[test]
    fn translation_collapses_onto_source_id() {
        let entity = post(
            "blog",
            7,
            serde_json::json!([{"lang": "en", "post_id": 42}]),
        );
        let remapped = remap_entry_id(&settings(), "de", &entity).unwrap();
        assert_eq!(remapped.id.as_str(), "03100042");
        assert_eq!(remapped.origin, RemapOrigin::Translation);
    }

    #[test]
    fn orphan_becomes_its_own_source() {
        let entity = post("knowledge", 7, serde_json::json!([]));
        let remapped = remap_entry_id(&settings(), "de", &entity).unwrap();
        assert_eq!(remapped.id.as_str(), "05000007");
        assert_eq!(remapped.origin, RemapOrigin::Orphan);
    }

    #[test]
    fn link_without_matching_key_is_orphaned() {
        // A translation entry for the right lang but the wrong id kind.
        let entity = post(
            "blog",
            7,
            serde_json::json!([{"lang": "en", "category_id": 42}]),
        );
        let remapped = remap_entry_id(&settings(), "de", &entity).unwrap();
        assert_eq!(remapped.origin, RemapOrigin::Orphan);
    }

    #[test]
    fn folding_requires_a_compiled_blog_term() {
        let mut index = TaxonomyIndex::for_kind(EntryKind::Category);
        let err = index.fold_knowledge(2).unwrap_err();
        assert!(matches!(
            err,
            MigrateError::UnmappedTaxonomy {
                kind: EntryKind::Category,
                id: 2
            }
        ));

        index.insert_blog(2, "ctf-cat-2".to_string());
        index.fold_knowledge(2).unwrap();
        assert_eq!(index.resolve(Site::Knowledge, 2), Some("ctf-cat-2"));
        assert_eq!(index.resolve(Site::Blog, 2), Some("ctf-cat-2"));
    }

    mod term_refs {
        use super::*;
        use crate::types::entry::Category;

        fn knowledge_category(id: u32, source_id: Option<u32>) -> Category {
            let translations = match source_id {
                Some(sid) => serde_json::json!([{"lang": "en", "category_id": sid}]),
                None => serde_json::json!([]),
            };
            serde_json::from_value(serde_json::json!({
                "id": id,
                "site": "knowledge",
                "name": "Training",
                "slug": "training",
                "mlp_translations": translations,
            }))
            .unwrap()
        }

        fn index_with_blog_term() -> TaxonomyIndex {
            let mut index = TaxonomyIndex::for_kind(EntryKind::Category);
            index.insert_blog(2, "ctf-cat-2".to_string());
            index
        }

        #[test]
        fn knowledge_ref_resolves_through_remap_table() {
            let mut index = index_with_blog_term();
            index.fold_knowledge(2).unwrap();
            let terms = vec![knowledge_category(77, Some(70))];

            let sys_id = resolve_term_ref(
                &settings(),
                &index,
                &terms,
                Site::Knowledge,
                200,
                77,
            )
            .unwrap();
            assert_eq!(sys_id, "ctf-cat-2");
        }

        #[test]
        fn unknown_term_names_the_post() {
            let index = index_with_blog_term();
            let terms: Vec<Category> = vec![];

            let err = resolve_term_ref(&settings(), &index, &terms, Site::Knowledge, 200, 77)
                .unwrap_err();
            assert!(matches!(
                err,
                MigrateError::UnknownReference {
                    post: 200,
                    id: 77,
                    ..
                }
            ));
        }

        #[test]
        fn term_without_source_link_is_fatal() {
            let index = index_with_blog_term();
            let terms = vec![knowledge_category(77, None)];

            let err = resolve_term_ref(&settings(), &index, &terms, Site::Knowledge, 200, 77)
                .unwrap_err();
            assert!(matches!(
                err,
                MigrateError::MissingSourceTranslation { id: 77, .. }
            ));
        }

        #[test]
        fn missing_remap_row_is_fatal() {
            let index = index_with_blog_term();
            // Source id 71 has no row in the remap table.
            let terms = vec![knowledge_category(77, Some(71))];

            let err = resolve_term_ref(&settings(), &index, &terms, Site::Knowledge, 200, 77)
                .unwrap_err();
            assert!(matches!(
                err,
                MigrateError::MissingCrossSiteRemap { id: 71, .. }
            ));
        }
    }
}
