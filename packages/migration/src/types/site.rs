//! The two WordPress sites merged by the migration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MigrateError;

/// Origin site of a dumped record.
///
/// Blog is the primary site: knowledge taxonomy is folded onto blog
/// taxonomy during prepare, never the other way around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    Blog,
    Knowledge,
}

impl Site {
    /// Digit separating blog and knowledge ids after the merge.
    pub fn id_flag(self) -> char {
        match self {
            Site::Blog => '1',
            Site::Knowledge => '0',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Site::Blog => "blog",
            Site::Knowledge => "knowledge",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Site {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blog" => Ok(Site::Blog),
            "knowledge" => Ok(Site::Knowledge),
            other => Err(MigrateError::UnknownSite {
                name: other.to_string(),
            }),
        }
    }
}
