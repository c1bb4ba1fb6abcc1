//! In-memory storage for tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use glob::Pattern;

use crate::error::StorageError;
use crate::storage::Storage;

const BACKEND: &str = "Mock";

/// Storage keeping file contents and modification times in memory.
///
/// Every write bumps the file's mtime by one second and is counted, so tests
/// can assert whether an operation wrote anything.
///
/// # Example
///
/// ```
/// use mdx_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("posts/a.mdx", "# A\n", 1_700_000_000.0);
///
/// assert_eq!(storage.scan("posts", "*.mdx").unwrap(), ["posts/a.mdx"]);
/// assert_eq!(storage.read("posts/a.mdx").unwrap(), "# A\n");
/// assert_eq!(storage.write_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    contents: RwLock<BTreeMap<String, String>>,
    mtimes: RwLock<HashMap<String, f64>>,
    writes: AtomicUsize,
}

impl MockStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with mtime `0.0`.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    #[must_use]
    pub fn with_content(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.with_file(path, content, 0.0)
    }

    /// Add a file with the given modification time.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    #[must_use]
    pub fn with_file(
        self,
        path: impl Into<String>,
        content: impl Into<String>,
        mtime: f64,
    ) -> Self {
        let path = path.into();
        self.mtimes.write().unwrap().insert(path.clone(), mtime);
        self.contents.write().unwrap().insert(path, content.into());
        self
    }

    /// Current content at `path`.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    #[must_use]
    pub fn content(&self, path: &str) -> Option<String> {
        self.contents.read().unwrap().get(path).cloned()
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn not_found(path: &str) -> StorageError {
        StorageError::not_found(path).with_backend(BACKEND)
    }
}

impl Storage for MockStorage {
    fn scan(&self, dir: &str, pattern: &str) -> Result<Vec<String>, StorageError> {
        let pattern = Pattern::new(pattern)
            .map_err(|e| StorageError::invalid_pattern(e).with_backend(BACKEND))?;
        let dir = dir.trim_end_matches('/');

        Ok(self
            .contents
            .read()
            .unwrap()
            .keys()
            .filter(|path| {
                let (parent, name) = path.rsplit_once('/').unwrap_or(("", path.as_str()));
                parent == dir && pattern.matches(name)
            })
            .cloned()
            .collect())
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        self.content(path).ok_or_else(|| Self::not_found(path))
    }

    fn write(&self, path: &str, content: &str) -> Result<(), StorageError> {
        self.contents
            .write()
            .unwrap()
            .insert(path.to_owned(), content.to_owned());
        let mut mtimes = self.mtimes.write().unwrap();
        let mtime = mtimes.get(path).map_or(0.0, |m| m + 1.0);
        mtimes.insert(path.to_owned(), mtime);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.contents.read().unwrap().contains_key(path)
    }

    fn mtime(&self, path: &str) -> Result<f64, StorageError> {
        self.mtimes
            .read()
            .unwrap()
            .get(path)
            .copied()
            .ok_or_else(|| Self::not_found(path))
    }
}
