//! Reset command implementation

use anyhow::{bail, Context, Result};
use bookcase_core::catalog::CATALOG_FILE;
use bookcase_core::storage::{LocalStorage, StorageProvider};
use std::path::Path;

/// Delete the saved catalog so the next run starts from the sample books
pub fn reset(data_dir: &Path, yes: bool) -> Result<()> {
    if !yes {
        bail!("Resetting discards every saved book; pass --yes to confirm");
    }

    let storage = LocalStorage::new(data_dir);
    if storage
        .exists(CATALOG_FILE)
        .context("Failed to inspect catalog directory")?
    {
        storage
            .delete(CATALOG_FILE)
            .context("Failed to delete saved catalog")?;
        tracing::info!("Deleted {}", data_dir.join(CATALOG_FILE).display());
    }

    println!("Catalog reset to the sample books");
    Ok(())
}
