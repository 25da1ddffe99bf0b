//! On-disk catalog document
//!
//! The whole collection is written as one JSON document, covers embedded as
//! base64. Older files without `saved_at` still load.

use crate::error::StorageError;
use crate::storage::{StorageProvider, StorageResult};
use crate::types::{Book, MAX_RATING};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current document format version
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct CatalogDocumentRef<'a> {
    version: u32,
    saved_at: DateTime<Utc>,
    books: &'a [Book],
}

#[derive(Deserialize)]
struct CatalogDocument {
    version: u32,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    books: Vec<Book>,
}

/// Serialize the collection into a document
pub fn encode(books: &[Book]) -> StorageResult<Vec<u8>> {
    let document = CatalogDocumentRef {
        version: FORMAT_VERSION,
        saved_at: Utc::now(),
        books,
    };
    Ok(serde_json::to_vec_pretty(&document)?)
}

/// Parse a document back into the collection
pub fn decode(data: &[u8]) -> StorageResult<Vec<Book>> {
    let document: CatalogDocument = serde_json::from_slice(data)?;
    if document.version > FORMAT_VERSION {
        return Err(StorageError::Backend(format!(
            "Unsupported catalog version {} (newest known is {})",
            document.version, FORMAT_VERSION
        )));
    }
    if let Some(saved_at) = document.saved_at {
        tracing::debug!("Catalog document saved at {}", saved_at);
    }

    let mut books = document.books;
    for book in books.iter_mut().filter(|b| b.rating > MAX_RATING) {
        tracing::warn!("Clamping rating {} of '{}'", book.rating, book.title);
        book.rating = MAX_RATING;
    }
    Ok(books)
}

/// Read the collection stored at `path`; `Ok(None)` when nothing is stored yet
pub fn read(storage: &dyn StorageProvider, path: &str) -> StorageResult<Option<Vec<Book>>> {
    if !storage.exists(path)? {
        return Ok(None);
    }
    let data = storage.read(path)?;
    decode(&data).map(Some)
}

/// Write the whole collection to `path`
pub fn write(storage: &dyn StorageProvider, path: &str, books: &[Book]) -> StorageResult<()> {
    let data = encode(books)?;
    storage.write(path, &data)
}
