//! Redirect bookkeeping for the URLs the migration moves.
//!
//! Every compiled category and post contributes one old/new pair; the
//! table serializes to a two-column CSV the web team feeds into the
//! redirect layer.

use std::borrow::Cow;

/// Append-only old/new URL pairs for one prepare run.
#[derive(Debug, Default)]
pub struct RewriteTable {
    rows: Vec<RewriteRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRow {
    pub old: String,
    pub new: String,
}

impl RewriteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, old: impl Into<String>, new: impl Into<String>) {
        self.rows.push(RewriteRow {
            old: old.into(),
            new: new.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[RewriteRow] {
        &self.rows
    }

    /// CSV document with an `old,new` header, rows in insertion order.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("old,new\n");
        for row in &self.rows {
            out.push_str(&escape(&row.old));
            out.push(',');
            out.push_str(&escape(&row.new));
            out.push('\n');
        }
        out
    }
}

/// Quote a field when it contains a delimiter, quote or newline.
fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
