//! CLI command implementations

mod add;
mod list;
mod lookup;
mod remove;
mod reset;
mod update;

pub use add::{add, NewBook};
pub use list::list;
pub use lookup::{lookup, LookupRequest};
pub use remove::remove;
pub use reset::reset;
pub use update::{update, BookEdits};

use bookcase_core::{Book, Catalog, SortOrder};
use std::path::Path;

/// Open the catalog with the view the user is addressing
fn open_catalog(data_dir: &Path, search: &str, sort: SortOrder) -> Catalog {
    let mut catalog = Catalog::open(data_dir);
    catalog.set_sort_order(sort);
    catalog.set_search_filter(search);
    catalog
}

/// Rating as five stars
fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// One-line description used in confirmations
fn describe(book: &Book) -> String {
    if book.author.is_empty() {
        format!("\"{}\"", book.title)
    } else {
        format!("\"{}\" by {}", book.title, book.author)
    }
}
