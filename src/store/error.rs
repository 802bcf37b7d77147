//! Error type for ordered collection stores.

use crate::collection::Collection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Item not found: {collection}/{id}")]
    NotFound { collection: Collection, id: String },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Custom(String),
}

impl StoreError {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        StoreError::Custom(msg.into())
    }

    /// Create a not found error
    pub fn not_found(collection: Collection, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection,
            id: id.into(),
        }
    }

    /// Turn an HTTP 404 on an item route into [`StoreError::NotFound`].
    #[must_use]
    pub fn or_not_found(self, collection: Collection, id: &str) -> Self {
        match self {
            StoreError::Status { status: 404, .. } => Self::not_found(collection, id),
            other => other,
        }
    }
}
