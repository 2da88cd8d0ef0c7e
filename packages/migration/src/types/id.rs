//! Destination-side entry identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::site::Site;

/// Identifier a migrated record keeps across all spaces.
///
/// Three fixed-width parts: the two-digit space code of the language the
/// record belongs to, the site flag, and the WordPress id zero-padded to
/// five digits. Code 3, blog, id 42 compiles to `03100042`. The padding
/// is a minimum width, so ids above 99999 keep their own digits and the
/// composition stays collision-free as long as codes fit two digits
/// (enforced when settings load).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn generate(code: u8, site: Site, id: u32) -> Self {
        EntryId(format!("{:02}{}{:05}", code, site.id_flag(), id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_code_and_id() {
        assert_eq!(EntryId::generate(3, Site::Blog, 42).as_str(), "03100042");
        assert_eq!(
            EntryId::generate(5, Site::Knowledge, 7).as_str(),
            "05000007"
        );
    }

    #[test]
    fn keeps_digits_beyond_pad_width() {
        assert_eq!(
            EntryId::generate(12, Site::Blog, 123456).as_str(),
            "121123456"
        );
    }

    #[test]
    fn distinct_inputs_never_collide() {
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        for code in [0u8, 1, 9, 42, 99] {
            for site in [Site::Blog, Site::Knowledge] {
                for id in [0u32, 1, 7, 99999, 100000, 4_294_967_295] {
                    assert!(seen.insert(EntryId::generate(code, site, id)));
                }
            }
        }
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = EntryId::generate(3, Site::Blog, 42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"03100042\"");
    }
}
