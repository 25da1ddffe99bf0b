//! Sort orders and search matching for catalog views

use crate::types::Book;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// How the catalog orders its books
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Title first, author breaks ties
    #[default]
    TitleThenAuthor,

    /// Author first, title breaks ties
    AuthorThenTitle,
}

impl SortOrder {
    /// Folded comparison key for a book under this order
    pub fn key(&self, book: &Book) -> (String, String) {
        match self {
            SortOrder::TitleThenAuthor => (fold(&book.title), fold(&book.author)),
            SortOrder::AuthorThenTitle => (fold(&book.author), fold(&book.title)),
        }
    }

    /// Sort books in place. Stable: equal keys keep their relative order.
    pub fn sort(&self, books: &mut [Book]) {
        books.sort_by_cached_key(|book| self.key(book));
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::TitleThenAuthor => f.write_str("title"),
            SortOrder::AuthorThenTitle => f.write_str("author"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(SortOrder::TitleThenAuthor),
            "author" => Ok(SortOrder::AuthorThenTitle),
            other => Err(format!(
                "unknown sort order '{}' (expected 'title' or 'author')",
                other
            )),
        }
    }
}

/// Case- and diacritic-insensitive form of `text`
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether the book's title or author contains the already-folded needle
pub fn matches(book: &Book, folded_needle: &str) -> bool {
    fold(&book.title).contains(folded_needle) || fold(&book.author).contains(folded_needle)
}
