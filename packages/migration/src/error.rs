//! Typed errors for the migration library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on the exact failure and every message names the offending record.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::entry::EntryKind;
use crate::types::site::Site;

/// Errors that can occur while preparing or importing a migration.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// No space code configured for a language
    #[error("no space code configured for lang \"{lang}\"")]
    MissingSourceCode { lang: String },

    /// Space code does not fit the two-digit id prefix
    #[error("space code {code} for lang \"{lang}\" does not fit in two digits")]
    InvalidSourceCode { lang: String, code: u32 },

    /// No authors configured, so posts cannot be attributed
    #[error("settings declare no authors")]
    MissingAuthors,

    /// Taxonomy term has no translation in the source language
    #[error("missing source for {site} {kind} id=\"{id}\"")]
    MissingSourceTranslation { site: Site, kind: EntryKind, id: u32 },

    /// Knowledge term has no row in the cross-site remap table
    #[error("missing mapping for {site} {kind} id=\"{id}\"")]
    MissingCrossSiteRemap { site: Site, kind: EntryKind, id: u32 },

    /// Remapped term id resolved to no compiled blog entry
    #[error("no blog {kind} compiled for remapped id=\"{id}\"")]
    UnmappedTaxonomy { kind: EntryKind, id: u32 },

    /// Post references a term id absent from the dump
    #[error("{site} post {post} references unknown {kind} id=\"{id}\"")]
    UnknownReference {
        site: Site,
        post: u32,
        kind: EntryKind,
        id: u32,
    },

    /// Site tag not recognized
    #[error("unknown site \"{name}\"")]
    UnknownSite { name: String },

    /// Host argument is not a usable URL
    #[error("invalid host URL \"{host}\"")]
    InvalidHost { host: String },

    /// Dump filename does not follow `{site}-{id}.json`
    #[error("invalid dump filename: {path}")]
    InvalidDumpFilename { path: PathBuf },

    /// Space config file missing for a site/lang pair
    #[error("no space config found for site {site} and lang {lang}")]
    MissingSpaceConfig { site: Site, lang: String },

    /// Filesystem read failed
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem write failed
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON in a data file did not parse
    #[error("invalid JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
