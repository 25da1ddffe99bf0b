//! Bookcase Core Library
//!
//! This crate provides the catalog store and remote book lookup for the
//! Bookcase personal book catalog. The catalog keeps the collection sorted,
//! filtered and persisted; the lookup service resolves a scanned identifier
//! to a book with its cover.

pub mod catalog;
pub mod config;
pub mod error;
pub mod lookup;
pub mod storage;
pub mod types;

pub use catalog::{Catalog, SharedCatalog, SortOrder};
pub use config::{CatalogConfig, LookupConfig};
pub use error::{BookcaseError, CatalogError, CoverError, LookupError, Result, StorageError};
pub use lookup::{BookLookup, LookupCallback, LookupOutcome, LookupService};
pub use types::{Book, Cover, ImageFormat};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_creation() {
        let book = Book::new("Test Book", "Test Author");
        assert_eq!(book.title, "Test Book");
        assert_eq!(book.author, "Test Author");
    }
}
