//! Entry payload compilers for the four content types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::compile::{LinkEnvelope, Localized, Sys};
use crate::types::id::EntryId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorEntry {
    pub sys: Sys,
    pub fields: AuthorFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorFields {
    #[serde(rename = "authorId")]
    pub author_id: Localized<EntryId>,
    pub name: Localized<String>,
}

pub fn author(lang: &str, sys_id: String, author_id: EntryId, name: String) -> AuthorEntry {
    AuthorEntry {
        sys: Sys::entry(sys_id, "author"),
        fields: AuthorFields {
            author_id: Localized::new(lang, author_id),
            name: Localized::new(lang, name),
        },
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub sys: Sys,
    pub fields: CategoryFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFields {
    #[serde(rename = "categoryId")]
    pub category_id: Localized<EntryId>,
    pub name: Localized<String>,
    pub slug: Localized<String>,
    pub description: Localized<String>,
}

pub fn category(
    lang: &str,
    sys_id: String,
    category_id: EntryId,
    name: String,
    slug: String,
    description: String,
) -> CategoryEntry {
    CategoryEntry {
        sys: Sys::entry(sys_id, "category"),
        fields: CategoryFields {
            category_id: Localized::new(lang, category_id),
            name: Localized::new(lang, name),
            slug: Localized::new(lang, slug),
            description: Localized::new(lang, description),
        },
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagEntry {
    pub sys: Sys,
    pub fields: TagFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagFields {
    #[serde(rename = "tagId")]
    pub tag_id: Localized<EntryId>,
    pub name: Localized<String>,
    pub slug: Localized<String>,
}

pub fn tag(lang: &str, sys_id: String, tag_id: EntryId, name: String, slug: String) -> TagEntry {
    TagEntry {
        sys: Sys::entry(sys_id, "tag"),
        fields: TagFields {
            tag_id: Localized::new(lang, tag_id),
            name: Localized::new(lang, name),
            slug: Localized::new(lang, slug),
        },
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostEntry {
    pub sys: Sys,
    pub fields: PostFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFields {
    #[serde(rename = "postId")]
    pub post_id: Localized<EntryId>,
    pub title: Localized<String>,
    pub slug: Localized<String>,
    pub description: Localized<String>,
    /// Omitted entirely when the post has no resolvable featured media.
    #[serde(
        rename = "featuredImage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub featured_image: Option<Localized<LinkEnvelope>>,
    pub body: Localized<String>,
    pub author: Localized<LinkEnvelope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Localized<LinkEnvelope>>,
    /// Always present; posts without tags serialize an empty array.
    pub tags: Localized<Vec<LinkEnvelope>>,
    #[serde(rename = "publishedOn")]
    pub published_on: Localized<NaiveDate>,
}

/// Everything `post` needs, resolved ahead of time by the pipeline.
#[derive(Debug, Clone)]
pub struct PostArgs {
    pub sys_id: String,
    pub post_id: EntryId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub featured_image_id: Option<String>,
    pub body: String,
    pub author_sys_id: String,
    pub category_sys_id: Option<String>,
    pub tag_sys_ids: Vec<String>,
    pub published_on: NaiveDate,
}

/// One record of the combined entries payload, in import order.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CompiledEntry {
    Author(AuthorEntry),
    Category(CategoryEntry),
    Tag(TagEntry),
    Post(PostEntry),
}

impl CompiledEntry {
    pub fn sys_id(&self) -> &str {
        match self {
            CompiledEntry::Author(entry) => &entry.sys.id,
            CompiledEntry::Category(entry) => &entry.sys.id,
            CompiledEntry::Tag(entry) => &entry.sys.id,
            CompiledEntry::Post(entry) => &entry.sys.id,
        }
    }
}

pub fn post(lang: &str, args: PostArgs) -> PostEntry {
    PostEntry {
        sys: Sys::entry(args.sys_id, "post"),
        fields: PostFields {
            post_id: Localized::new(lang, args.post_id),
            title: Localized::new(lang, args.title),
            slug: Localized::new(lang, args.slug),
            description: Localized::new(lang, args.description),
            featured_image: args
                .featured_image_id
                .map(|id| Localized::new(lang, LinkEnvelope::asset(id))),
            body: Localized::new(lang, args.body),
            author: Localized::new(lang, LinkEnvelope::entry(args.author_sys_id)),
            category: args
                .category_sys_id
                .map(|id| Localized::new(lang, LinkEnvelope::entry(id))),
            tags: Localized::new(
                lang,
                args.tag_sys_ids
                    .into_iter()
                    .map(LinkEnvelope::entry)
                    .collect(),
            ),
            published_on: Localized::new(lang, args.published_on),
        },
    }
}
