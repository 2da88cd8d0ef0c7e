//! Migration pipeline - the steps the CLI drives.
//!
//! The steps run in a fixed order per language:
//! - Prepare assets (scan dumps, compile the upload payload)
//! - Import assets (chunked push, then re-export destination URLs)
//! - Prepare entries (compile authors/categories/tags/posts, rewrite bodies)
//! - Import entries (chunked push)

pub mod assets;
pub mod entries;
pub mod import;

pub use assets::{prepare_assets, AssetSummary};
pub use entries::{prepare_entries, PrepareSummary};
pub use import::{
    import_in_chunks, ImportError, ImportKind, ImportReport, SpaceImporter, DEFAULT_CHUNK_SIZE,
};
