//! Error types for Bookcase Core

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using BookcaseError
pub type Result<T> = std::result::Result<T, BookcaseError>;

/// Top-level error type for all Bookcase operations
#[derive(Debug, Error)]
pub enum BookcaseError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Cover error: {0}")]
    Cover(#[from] CoverError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by catalog addressing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Index {index} is out of range (catalog shows {len} books)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Book {0} is in the filtered view but missing from the catalog")]
    Inconsistent(Uuid),
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from either stage of a remote lookup
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { status: u16, url: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Lookup was cancelled")]
    Cancelled,
}

/// Errors recognizing cover image bytes
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoverError {
    #[error("Image data is empty")]
    Empty,

    #[error("Unrecognized image format")]
    UnrecognizedFormat,
}

impl From<CoverError> for LookupError {
    fn from(e: CoverError) -> Self {
        LookupError::Decode(e.to_string())
    }
}
