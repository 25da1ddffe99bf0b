//! Remove command implementation

use super::{describe, open_catalog};
use anyhow::{Context, Result};
use bookcase_core::SortOrder;
use std::path::Path;

/// Remove the book at `index` of the view selected by `search` and `sort`
pub fn remove(data_dir: &Path, search: &str, sort: SortOrder, index: usize) -> Result<()> {
    let mut catalog = open_catalog(data_dir, search, sort);
    let removed = catalog
        .remove(index)
        .with_context(|| format!("Failed to remove book at index {}", index))?;

    println!("Removed {}", describe(&removed));
    Ok(())
}
