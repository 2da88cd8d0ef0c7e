//! Error types for the WordPress client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WordPressError {
    /// Transport-level failure talking to the site
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the REST API
    #[error("WordPress API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// A list endpoint kept returning full pages
    #[error("gave up paging /{resource} after {pages} full pages")]
    MaxPagesExceeded { resource: String, pages: usize },
}

pub type Result<T> = std::result::Result<T, WordPressError>;
