//! Domain types: sites, ids, dumped records and run settings.

pub mod entry;
pub mod id;
pub mod settings;
pub mod site;

pub use entry::{
    Category, EntryKind, Post, Rendered, SourceEntity, Tag, TranslationLink, YoastMeta,
};
pub use id::EntryId;
pub use settings::Settings;
pub use site::Site;
