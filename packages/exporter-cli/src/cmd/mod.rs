//! Command implementations

pub mod export;
pub mod import;
pub mod prepare;
pub mod space;

use std::path::PathBuf;

use migration::{DataDir, Site};

/// Everything the global flags decide, shared by all commands.
pub struct Context {
    pub host: String,
    pub lang: String,
    pub site: Site,
    pub dir: PathBuf,
    pub settings: PathBuf,
}

impl Context {
    pub fn layout(&self) -> DataDir {
        DataDir::new(&self.dir, &self.lang)
    }
}
