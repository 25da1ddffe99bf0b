//! Add command implementation

use super::describe;
use anyhow::{bail, Context, Result};
use bookcase_core::{Book, Catalog, Cover};
use std::path::{Path, PathBuf};

/// Fields for a manually entered book
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub rating: u8,
    pub isbn: String,
    pub notes: String,
    pub cover: Option<PathBuf>,
}

/// Add a book to the catalog
pub fn add(data_dir: &Path, fields: NewBook) -> Result<()> {
    let mut book = Book::new(fields.title, fields.author)
        .with_rating(fields.rating)
        .with_isbn(fields.isbn)
        .with_notes(fields.notes);

    if !book.is_complete() {
        bail!("A book needs a title");
    }

    if let Some(path) = fields.cover {
        let cover = Cover::from_file(&path)
            .with_context(|| format!("Failed to read cover image: {}", path.display()))?;
        book = book.with_cover(cover);
    }

    let description = describe(&book);
    let mut catalog = Catalog::open(data_dir);
    catalog.add(book);

    tracing::info!("Catalog now holds {} books", catalog.len());
    println!("Added {}", description);
    Ok(())
}
