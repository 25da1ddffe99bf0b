//! List command implementation

use super::{open_catalog, stars};
use anyhow::Result;
use bookcase_core::{Book, SortOrder};
use serde::Serialize;
use std::path::Path;

/// Book row output
#[derive(Serialize)]
struct BookRow {
    index: usize,
    id: String,
    title: String,
    author: String,
    rating: u8,
    isbn: String,
    notes: String,
    cover: Option<CoverInfo>,
}

#[derive(Serialize)]
struct CoverInfo {
    mime_type: &'static str,
    bytes: usize,
}

impl BookRow {
    fn new(index: usize, book: &Book) -> Self {
        Self {
            index,
            id: book.id.to_string(),
            title: book.title.clone(),
            author: book.author.clone(),
            rating: book.rating,
            isbn: book.isbn.clone(),
            notes: book.notes.clone(),
            cover: book.cover.as_ref().map(|c| CoverInfo {
                mime_type: c.mime_type(),
                bytes: c.len(),
            }),
        }
    }
}

/// List the books in the active view
pub fn list(data_dir: &Path, search: &str, sort: SortOrder, json: bool) -> Result<()> {
    let catalog = open_catalog(data_dir, search, sort);

    let rows: Vec<BookRow> = catalog
        .iter()
        .enumerate()
        .map(|(index, book)| BookRow::new(index, book))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        if catalog.is_filtering() {
            println!("No books match \"{}\"", search);
        } else {
            println!("No books in the catalog");
        }
        return Ok(());
    }

    for row in &rows {
        println!("{:>3}  {}  {} by {}", row.index, stars(row.rating), row.title, row.author);
        if !row.isbn.is_empty() {
            println!("       ISBN:  {}", row.isbn);
        }
        if !row.notes.is_empty() {
            println!("       Notes: {}", row.notes);
        }
        if let Some(cover) = &row.cover {
            println!("       Cover: {} ({} bytes)", cover.mime_type, cover.bytes);
        }
    }

    if catalog.is_filtering() {
        println!("\n{} of {} books", catalog.count(), catalog.len());
    } else {
        println!("\n{} books", catalog.count());
    }

    Ok(())
}
