//! WordPress to Contentful Migration Library
//!
//! Everything needed to move a multi-language, two-site WordPress
//! install (a blog and a knowledge base) into per-language Contentful
//! spaces: dump loading, id remapping, cross-site taxonomy merging,
//! HTML to Markdown transcoding, asset URL rewriting and chunked
//! imports.
//!
//! # Design Philosophy
//!
//! **"Resolve first, compile dumb"**
//!
//! - Every destination id is derived before compiling, never during
//! - The source language is the anchor: translations collapse onto it
//! - Blog wins: knowledge taxonomy folds onto blog taxonomy
//! - Data gaps on taxonomy are fatal; gaps on posts degrade loudly
//!
//! # Modules
//!
//! - [`types`] - Dumped records, settings, sites and destination ids
//! - [`resolver`] - Id remapping and the cross-site taxonomy index
//! - [`html`] - HTML to Markdown transcoding
//! - [`rewrite`] - Asset URL and internal link rewriting
//! - [`compile`] - Destination payload compilers (entries, assets, content types)
//! - [`pipeline`] - The prepare and import steps the CLI drives
//! - [`layout`] - On-disk layout of a migration working directory
//! - [`redirects`] - The old/new URL table behind `rewrite.csv`
//! - [`testing`] - Mock implementations for testing

pub mod compile;
pub mod error;
pub mod html;
pub mod layout;
pub mod pipeline;
pub mod redirects;
pub mod resolver;
pub mod rewrite;
pub mod testing;
pub mod types;

// Re-export core types at crate root
pub use error::{MigrateError, Result};
pub use types::{
    Category, EntryId, EntryKind, Post, Settings, Site, SourceEntity, Tag, TranslationLink,
};

// Re-export pipeline entry points
pub use pipeline::{
    import_in_chunks, prepare_assets, prepare_entries, AssetSummary, ImportKind, ImportReport,
    PrepareSummary, SpaceImporter, DEFAULT_CHUNK_SIZE,
};

// Re-export the pieces clients and tests reach for directly
pub use compile::{asset_id, content_types::content_types, new_sys_id, Asset, CompiledEntry};
pub use layout::{DataDir, SpaceConfig, DEFAULT_SPACE_CONFIG_DIR};
pub use resolver::{remap_entry_id, RemapOrigin, Remapped, TaxonomyIndex};
pub use rewrite::{rewrite_with_cdn, AssetUrlMaps, LinkRewriter, RewriteOutcome};
