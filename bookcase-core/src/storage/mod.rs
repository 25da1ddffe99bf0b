//! Storage abstraction for the catalog file

use crate::error::StorageError;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Abstract storage provider trait
///
/// Operations are synchronous: the catalog persists before a mutation returns.
pub trait StorageProvider: Send + Sync {
    /// Read data from the given path
    fn read(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Write data to the given path, replacing any previous content
    fn write(&self, path: &str, data: &[u8]) -> StorageResult<()>;

    /// Check if a path exists
    fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Delete data at the given path
    fn delete(&self, path: &str) -> StorageResult<()>;
}

fn map_io(path: &Path, e: std::io::Error) -> StorageError {
    match e.kind() {
        ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
        ErrorKind::PermissionDenied => StorageError::PermissionDenied(path.display().to_string()),
        _ => StorageError::Backend(format!("{}: {}", path.display(), e)),
    }
}

/// Local filesystem storage provider
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create a new local storage provider with the given root directory.
    /// The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this provider
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Safely resolve a path, preventing path traversal attacks
    fn full_path(&self, path: &str) -> StorageResult<PathBuf> {
        let mut normalized = PathBuf::new();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(c) => normalized.push(c),
                Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) | Component::RootDir => {
                    return Err(StorageError::Backend(
                        "Path traversal attempt detected".to_string(),
                    ));
                }
            }
        }

        if normalized.as_os_str().is_empty() {
            return Err(StorageError::Backend("Empty storage path".to_string()));
        }

        Ok(self.root.join(normalized))
    }
}

impl StorageProvider for LocalStorage {
    fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        let full_path = self.full_path(path)?;
        std::fs::read(&full_path).map_err(|e| map_io(&full_path, e))
    }

    /// Writes to a temp file then renames, so readers never see a partial file
    fn write(&self, path: &str, data: &[u8]) -> StorageResult<()> {
        let full_path = self.full_path(path)?;
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| map_io(parent, e))?;
        }

        let mut temp_name = full_path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        std::fs::write(&temp_path, data).map_err(|e| map_io(&temp_path, e))?;
        std::fs::rename(&temp_path, &full_path).map_err(|e| map_io(&full_path, e))
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        let full_path = self.full_path(path)?;
        full_path
            .try_exists()
            .map_err(|e| map_io(&full_path, e))
    }

    fn delete(&self, path: &str) -> StorageResult<()> {
        let full_path = self.full_path(path)?;
        std::fs::remove_file(&full_path).map_err(|e| map_io(&full_path, e))
    }
}

/// In-memory storage provider (for testing)
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a backend error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn map(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Vec<u8>>> {
        self.data.read().unwrap_or_else(|e| e.into_inner())
    }

    fn map_mut(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<u8>>> {
        self.data.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl StorageProvider for MemoryStorage {
    fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        self.map()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    fn write(&self, path: &str, data: &[u8]) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend(format!("write to {} refused", path)));
        }
        self.map_mut().insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self.map().contains_key(path))
    }

    fn delete(&self, path: &str) -> StorageResult<()> {
        self.map_mut()
            .remove(path)
            .ok_or_else(|| StorageError::NotFound(path.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();

        // Write
        storage.write("test.json", b"hello").unwrap();

        // Read
        let data = storage.read("test.json").unwrap();
        assert_eq!(data, b"hello");

        // Exists
        assert!(storage.exists("test.json").unwrap());
        assert!(!storage.exists("missing.json").unwrap());

        // Delete
        storage.delete("test.json").unwrap();
        assert!(!storage.exists("test.json").unwrap());
        assert!(matches!(
            storage.read("test.json"),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_memory_storage_refuses_writes() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        assert!(matches!(
            storage.write("test.json", b"x"),
            Err(StorageError::Backend(_))
        ));
        storage.set_fail_writes(false);
        storage.write("test.json", b"x").unwrap();
    }

    #[test]
    fn test_local_storage_creates_root_and_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("nested").join("data"));

        assert!(!storage.exists("books.json").unwrap());
        storage.write("books.json", b"first").unwrap();
        storage.write("books.json", b"second").unwrap();

        assert_eq!(storage.read("books.json").unwrap(), b"second");
        assert!(!storage.root().join("books.json.tmp").exists());

        storage.delete("books.json").unwrap();
        assert!(matches!(
            storage.read("books.json"),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_local_storage_rejects_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        assert!(storage.read("../escape.json").is_err());
        assert!(storage.write("/etc/passwd", b"x").is_err());
        assert!(storage.exists("").is_err());
    }
}
