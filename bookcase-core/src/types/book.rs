//! The Book type - one entry in the catalog

use super::Cover;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Highest rating a book can carry
pub const MAX_RATING: u8 = 5;

/// Placeholder ISBN given to books built from a remote lookup
pub const PLACEHOLDER_ISBN: &str = "0";

/// A catalogued book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    /// Stable identity, assigned at construction
    pub id: Uuid,

    /// Book title
    pub title: String,

    /// Author, or several joined with a comma
    pub author: String,

    /// Rating from 0 to 5
    pub rating: u8,

    /// ISBN (may be empty, not unique)
    #[serde(default)]
    pub isbn: String,

    /// Free-form notes
    #[serde(default)]
    pub notes: String,

    /// Cover image, if one was captured or downloaded
    #[serde(default)]
    pub cover: Option<Cover>,
}

impl Book {
    /// Create a new book with the given title and author
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            author: author.into(),
            rating: 0,
            isbn: String::new(),
            notes: String::new(),
            cover: None,
        }
    }

    /// Set the rating, clamped to `MAX_RATING`
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = rating.min(MAX_RATING);
        self
    }

    /// Set the ISBN
    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = isbn.into();
        self
    }

    /// Set notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Attach a cover image
    pub fn with_cover(mut self, cover: Cover) -> Self {
        self.cover = Some(cover);
        self
    }

    /// Whether the book has enough information to be saved.
    /// Callers check this; the catalog accepts any book.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Whether a cover image is attached
    pub fn has_cover(&self) -> bool {
        self.cover.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_creation() {
        let book = Book::new("Emma", "Jane Austen");
        assert_eq!(book.title, "Emma");
        assert_eq!(book.author, "Jane Austen");
        assert_eq!(book.rating, 0);
        assert!(book.isbn.is_empty());
        assert!(book.notes.is_empty());
        assert!(!book.has_cover());
        assert!(book.is_complete());
    }

    #[test]
    fn test_rating_is_clamped() {
        let book = Book::new("Emma", "Jane Austen").with_rating(9);
        assert_eq!(book.rating, MAX_RATING);
    }

    #[test]
    fn test_blank_title_is_incomplete() {
        assert!(!Book::new("   ", "Anonymous").is_complete());
    }

    #[test]
    fn test_equality_covers_every_field() {
        let book = Book::new("Emma", "Jane Austen").with_rating(5);
        let mut other = book.clone();
        assert_eq!(book, other);

        other.notes = "signed".to_string();
        assert_ne!(book, other);

        // Same fields, different identity
        let twin = Book {
            id: Uuid::new_v4(),
            ..book.clone()
        };
        assert_ne!(book, twin);
    }

    #[test]
    fn test_book_serialization() {
        let book = Book::new("Serialization Test", "Tester")
            .with_isbn("9780140817997")
            .with_notes("notes");
        let json = serde_json::to_string(&book).unwrap();
        let deserialized: Book = serde_json::from_str(&json).unwrap();
        assert_eq!(book, deserialized);
    }
}
