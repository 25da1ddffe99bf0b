//! Update command implementation

use super::{describe, open_catalog};
use anyhow::{bail, Context, Result};
use bookcase_core::{Cover, SortOrder};
use std::path::{Path, PathBuf};

/// Changes to apply to an existing book; `None` keeps the current value
pub struct BookEdits {
    pub title: Option<String>,
    pub author: Option<String>,
    pub rating: Option<u8>,
    pub isbn: Option<String>,
    pub notes: Option<String>,
    pub cover: Option<PathBuf>,
    pub clear_cover: bool,
}

/// Update the book at `index` of the view selected by `search` and `sort`
pub fn update(
    data_dir: &Path,
    search: &str,
    sort: SortOrder,
    index: usize,
    edits: BookEdits,
) -> Result<()> {
    let mut catalog = open_catalog(data_dir, search, sort);
    let mut book = catalog
        .get(index)
        .with_context(|| format!("No book at index {}", index))?
        .clone();

    if let Some(title) = edits.title {
        book.title = title;
    }
    if let Some(author) = edits.author {
        book.author = author;
    }
    if let Some(rating) = edits.rating {
        book = book.with_rating(rating);
    }
    if let Some(isbn) = edits.isbn {
        book.isbn = isbn;
    }
    if let Some(notes) = edits.notes {
        book.notes = notes;
    }
    if edits.clear_cover {
        book.cover = None;
    }
    if let Some(path) = edits.cover {
        let cover = Cover::from_file(&path)
            .with_context(|| format!("Failed to read cover image: {}", path.display()))?;
        book.cover = Some(cover);
    }

    if !book.is_complete() {
        bail!("A book needs a title");
    }

    let description = describe(&book);
    catalog
        .update(index, book)
        .with_context(|| format!("Failed to update book at index {}", index))?;

    println!("Updated {}", description);
    Ok(())
}
