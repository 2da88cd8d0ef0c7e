//! On-disk layout of a migration working directory.
//!
//! Everything lives under `{dir}/{lang}`: the `dump/` tree the exporter
//! fills and the `export/` tree the prepare steps write. Space configs
//! sit outside the data dir, one JSON file per site/lang pair.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};
use crate::types::entry::EntryKind;
use crate::types::site::Site;

/// Where `space create` drops its config files, relative to the
/// invocation directory.
pub const DEFAULT_SPACE_CONFIG_DIR: &str = "config/spaces";

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read(path).map_err(|source| MigrateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| MigrateError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let raw = serde_json::to_vec(value).map_err(|source| MigrateError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, raw).map_err(|source| MigrateError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| MigrateError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// The per-language working directory.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(dir: &Path, lang: &str) -> Self {
        DataDir {
            root: dir.join(lang),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dump_entries(&self, kind: EntryKind) -> PathBuf {
        self.root.join("dump").join("entries").join(kind.as_str())
    }

    /// Placeholder for binary asset dumps; nothing reads it today.
    pub fn dump_assets(&self) -> PathBuf {
        self.root.join("dump").join("assets")
    }

    /// Dump file for one record: `dump/entries/{kind}/{site}-{id}.json`.
    pub fn dump_file(&self, kind: EntryKind, site: Site, id: u64) -> PathBuf {
        self.dump_entries(kind).join(format!("{site}-{id}.json"))
    }

    pub fn export_dir(&self) -> PathBuf {
        self.root.join("export")
    }

    pub fn entries_file(&self) -> PathBuf {
        self.export_dir().join("entries.json")
    }

    pub fn assets_file(&self) -> PathBuf {
        self.export_dir().join("assets.json")
    }

    /// Destination-side asset records written back after `import assets`.
    pub fn exported_assets_file(&self) -> PathBuf {
        self.export_dir().join("contentful-export-assets.json")
    }

    pub fn rewrite_file(&self) -> PathBuf {
        self.export_dir().join("rewrite.csv")
    }

    /// Wipe and recreate the whole tree for a fresh export.
    pub fn setup(&self) -> Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root).map_err(|source| MigrateError::Write {
                path: self.root.clone(),
                source,
            })?;
        }
        for kind in [EntryKind::Post, EntryKind::Category, EntryKind::Tag] {
            let dir = self.dump_entries(kind);
            fs::create_dir_all(&dir).map_err(|source| MigrateError::Write {
                path: dir,
                source,
            })?;
        }
        for dir in [self.dump_assets(), self.export_dir()] {
            fs::create_dir_all(&dir).map_err(|source| MigrateError::Write {
                path: dir,
                source,
            })?;
        }
        Ok(())
    }
}

/// Identity of one destination space, written by `space create` and
/// required by every import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceConfig {
    pub id: String,
    pub name: String,
    pub lang: String,
}

pub fn space_config_path(config_dir: &Path, site: Site, lang: &str) -> PathBuf {
    config_dir.join(format!("{site}-{lang}.json"))
}

impl SpaceConfig {
    pub fn load(config_dir: &Path, site: Site, lang: &str) -> Result<Self> {
        let path = space_config_path(config_dir, site, lang);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(MigrateError::MissingSpaceConfig {
                    site,
                    lang: lang.to_string(),
                })
            }
            Err(source) => return Err(MigrateError::Read { path, source }),
        };
        serde_json::from_slice(&raw).map_err(|source| MigrateError::Json { path, source })
    }

    pub fn save(&self, config_dir: &Path, site: Site) -> Result<()> {
        fs::create_dir_all(config_dir).map_err(|source| MigrateError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;
        write_json(&space_config_path(config_dir, site, &self.lang), self)
    }

    pub fn exists(config_dir: &Path, site: Site, lang: &str) -> bool {
        space_config_path(config_dir, site, lang).is_file()
    }

    pub fn remove(config_dir: &Path, site: Site, lang: &str) -> Result<()> {
        let path = space_config_path(config_dir, site, lang);
        fs::remove_file(&path).map_err(|source| MigrateError::Write { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_creates_the_full_tree() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataDir::new(dir.path(), "de");
        layout.setup().unwrap();

        assert!(layout.dump_entries(EntryKind::Post).is_dir());
        assert!(layout.dump_entries(EntryKind::Category).is_dir());
        assert!(layout.dump_entries(EntryKind::Tag).is_dir());
        assert!(layout.dump_assets().is_dir());
        assert!(layout.export_dir().is_dir());
    }

    #[test]
    fn setup_discards_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataDir::new(dir.path(), "de");
        layout.setup().unwrap();
        let stale = layout.dump_file(EntryKind::Post, Site::Blog, 1);
        fs::write(&stale, "{}").unwrap();

        layout.setup().unwrap();
        assert!(!stale.exists());
    }

    #[test]
    fn dump_files_are_named_by_site_and_id() {
        let layout = DataDir::new(Path::new("/data"), "en");
        assert_eq!(
            layout.dump_file(EntryKind::Category, Site::Knowledge, 7),
            Path::new("/data/en/dump/entries/category/knowledge-7.json")
        );
    }

    #[test]
    fn space_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let config = SpaceConfig {
            id: "s1".to_string(),
            name: "blog/de".to_string(),
            lang: "de".to_string(),
        };
        config.save(dir.path(), Site::Blog).unwrap();

        assert!(SpaceConfig::exists(dir.path(), Site::Blog, "de"));
        let loaded = SpaceConfig::load(dir.path(), Site::Blog, "de").unwrap();
        assert_eq!(loaded.id, "s1");

        SpaceConfig::remove(dir.path(), Site::Blog, "de").unwrap();
        assert!(!SpaceConfig::exists(dir.path(), Site::Blog, "de"));
    }

    #[test]
    fn missing_space_config_is_a_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SpaceConfig::load(dir.path(), Site::Knowledge, "fr").unwrap_err();
        assert!(matches!(
            err,
            MigrateError::MissingSpaceConfig { site: Site::Knowledge, lang } if lang == "fr"
        ));
    }
}
