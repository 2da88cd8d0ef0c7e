//! Error types for the Contentful client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentfulError {
    /// `CONTENTFUL_MANAGEMENT_TOKEN` is not set
    #[error("CONTENTFUL_MANAGEMENT_TOKEN is not set")]
    MissingToken,

    /// Transport-level failure talking to the management API
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the management API
    #[error("Contentful API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("unexpected response shape: {0}")]
    Json(#[from] serde_json::Error),

    /// A record in an import payload carries no usable `sys.id`
    #[error("record has no sys.id")]
    MissingRecordId,

    /// An entry payload carries no content type link
    #[error("entry {id} has no content type link")]
    MissingContentType { id: String },

    /// The backend never finished processing an uploaded file
    #[error("asset {asset_id} still processing after {attempts} checks")]
    ProcessingTimeout { asset_id: String, attempts: usize },

    /// A listing endpoint kept returning full pages
    #[error("gave up paging {resource} after {pages} full pages")]
    MaxPagesExceeded { resource: String, pages: usize },
}

pub type Result<T> = std::result::Result<T, ContentfulError>;
