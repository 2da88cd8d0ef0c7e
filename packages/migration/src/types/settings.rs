//! Run configuration loaded from `settings.json`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};
use crate::types::entry::EntryKind;
use crate::types::site::Site;

/// Everything a prepare run needs to know that is not in the dumps:
/// the source language, per-language space codes, category exclusions,
/// the knowledge→blog taxonomy remap tables and the author roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub source: SourceSettings,
    pub prepare: PrepareSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    /// The master language every translation collapses onto.
    pub lang: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareSettings {
    pub spaces: SpaceSettings,
    #[serde(default)]
    pub exclude: ExcludeSettings,
    #[serde(default)]
    pub remap: RemapSettings,
    /// Author names compiled into every space; posts link the first one.
    #[serde(default)]
    pub authors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceSettings {
    /// Two-digit code per language, the id prefix telling spaces apart.
    pub codes: HashMap<String, u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeSettings {
    #[serde(default)]
    pub categories: SiteLangIds,
}

/// Id lists keyed by site, then by language.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteLangIds {
    #[serde(default)]
    pub blog: HashMap<String, Vec<u32>>,
    #[serde(default)]
    pub knowledge: HashMap<String, Vec<u32>>,
}

impl SiteLangIds {
    pub fn ids(&self, site: Site, lang: &str) -> &[u32] {
        let per_lang = match site {
            Site::Blog => &self.blog,
            Site::Knowledge => &self.knowledge,
        };
        per_lang.get(lang).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Source-language taxonomy rows mapping knowledge term ids onto the
/// blog terms that absorb them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemapSettings {
    #[serde(default)]
    pub categories: HashMap<u32, u32>,
    #[serde(default)]
    pub tags: HashMap<u32, u32>,
}

impl RemapSettings {
    pub fn table(&self, kind: EntryKind) -> Option<&HashMap<u32, u32>> {
        match kind {
            EntryKind::Category => Some(&self.categories),
            EntryKind::Tag => Some(&self.tags),
            EntryKind::Post => None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path).map_err(|source| MigrateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_slice(&raw).map_err(|source| MigrateError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject configurations that would only fail mid-run: codes that
    /// break the two-digit id prefix, a source language without a code,
    /// an empty author roster.
    pub fn validate(&self) -> Result<()> {
        for (lang, code) in &self.prepare.spaces.codes {
            if *code > 99 {
                return Err(MigrateError::InvalidSourceCode {
                    lang: lang.clone(),
                    code: u32::from(*code),
                });
            }
        }
        self.code_for(&self.source.lang)?;
        if self.prepare.authors.is_empty() {
            return Err(MigrateError::MissingAuthors);
        }
        Ok(())
    }

    pub fn code_for(&self, lang: &str) -> Result<u8> {
        self.prepare
            .spaces
            .codes
            .get(lang)
            .copied()
            .ok_or_else(|| MigrateError::MissingSourceCode {
                lang: lang.to_string(),
            })
    }

    /// Code of the source language itself.
    pub fn source_code(&self) -> Result<u8> {
        self.code_for(&self.source.lang)
    }

    pub fn excluded_categories(&self, site: Site, lang: &str) -> &[u32] {
        self.prepare.exclude.categories.ids(site, lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Settings {
        serde_json::from_value(serde_json::json!({
            "source": {"lang": "en"},
            "prepare": {
                "spaces": {"codes": {"en": 3, "de": 5}},
                "exclude": {
                    "categories": {
                        "blog": {"de": [19, 20]},
                        "knowledge": {}
                    }
                },
                "remap": {
                    "categories": {"70": 2},
                    "tags": {}
                },
                "authors": ["Robin Mark"]
            }
        }))
        .unwrap()
    }

    #[test]
    fn parses_full_document() {
        let settings = sample();
        assert_eq!(settings.source.lang, "en");
        assert_eq!(settings.code_for("de").unwrap(), 5);
        assert_eq!(settings.excluded_categories(Site::Blog, "de"), &[19, 20]);
        assert_eq!(
            settings.excluded_categories(Site::Knowledge, "de"),
            &[] as &[u32]
        );
        assert_eq!(
            settings
                .prepare
                .remap
                .table(EntryKind::Category)
                .and_then(|t| t.get(&70)),
            Some(&2)
        );
        settings.validate().unwrap();
    }

    #[test]
    fn rejects_unknown_language() {
        let err = sample().code_for("pt").unwrap_err();
        assert!(matches!(err, MigrateError::MissingSourceCode { lang } if lang == "pt"));
    }

    #[test]
    fn rejects_code_wider_than_two_digits() {
        let mut settings = sample();
        settings
            .prepare
            .spaces
            .codes
            .insert("fr".to_string(), 120);
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, MigrateError::InvalidSourceCode { code: 120, .. }));
    }

    #[test]
    fn rejects_source_lang_without_code() {
        let mut settings = sample();
        settings.source.lang = "it".to_string();
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, MigrateError::MissingSourceCode { lang } if lang == "it"));
    }

    #[test]
    fn rejects_empty_author_roster() {
        let mut settings = sample();
        settings.prepare.authors.clear();
        assert!(matches!(
            settings.validate().unwrap_err(),
            MigrateError::MissingAuthors
        ));
    }
}
