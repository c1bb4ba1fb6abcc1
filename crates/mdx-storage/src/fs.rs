//! Filesystem storage implementation.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use glob::Pattern;

use crate::error::StorageError;
use crate::storage::{Storage, join_path};

const BACKEND: &str = "Fs";

/// Storage over a directory on the local filesystem.
///
/// Paths containing `..` or starting at the filesystem root are rejected
/// with [`StorageErrorKind::InvalidPath`](crate::StorageErrorKind::InvalidPath).
#[derive(Clone, Debug)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path under the root.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let escapes = Path::new(path).components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(StorageError::invalid_path(path).with_backend(BACKEND));
        }
        Ok(self.root.join(path))
    }
}

impl Storage for FsStorage {
    fn scan(&self, dir: &str, pattern: &str) -> Result<Vec<String>, StorageError> {
        let pattern = Pattern::new(pattern)
            .map_err(|e| StorageError::invalid_pattern(e).with_backend(BACKEND))?;
        let full_dir = self.resolve(dir)?;
        if !full_dir.is_dir() {
            tracing::debug!(dir = %full_dir.display(), "Scan directory missing");
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&full_dir)
            .map_err(|e| StorageError::io(e, &full_dir).with_backend(BACKEND))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(e, &full_dir).with_backend(BACKEND))?;
            if !entry.file_type().is_ok_and(|t| t.is_file()) {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                tracing::debug!(dir = %full_dir.display(), "Skipping non-UTF-8 file name");
                continue;
            };
            if pattern.matches(&name) {
                paths.push(join_path(dir, &name));
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        let full_path = self.resolve(path)?;
        fs::read_to_string(&full_path)
            .map_err(|e| StorageError::io(e, full_path).with_backend(BACKEND))
    }

    fn write(&self, path: &str, content: &str) -> Result<(), StorageError> {
        let full_path = self.resolve(path)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::io(e, parent).with_backend(BACKEND))?;
        }
        fs::write(&full_path, content)
            .map_err(|e| StorageError::io(e, &full_path).with_backend(BACKEND))?;
        tracing::debug!(path = %full_path.display(), bytes = content.len(), "Wrote file");
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.is_file())
    }

    fn mtime(&self, path: &str) -> Result<f64, StorageError> {
        let full_path = self.resolve(path)?;
        let modified = fs::metadata(&full_path)
            .and_then(|m| m.modified())
            .map_err(|e| StorageError::io(e, &full_path).with_backend(BACKEND))?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::error::StorageErrorKind;

    fn storage_with(files: &[(&str, &str)]) -> (TempDir, FsStorage) {
        let temp = TempDir::new().unwrap();
        for (path, content) in files {
            let full = temp.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        let storage = FsStorage::new(temp.path());
        (temp, storage)
    }

    #[test]
    fn test_scan_matches_pattern_sorted() {
        let (_temp, storage) = storage_with(&[
            ("posts/b.mdx", ""),
            ("posts/a.mdx", ""),
            ("posts/notes.txt", ""),
            ("posts/drafts/c.mdx", ""),
        ]);
        assert_eq!(
            storage.scan("posts", "*.mdx").unwrap(),
            ["posts/a.mdx", "posts/b.mdx"]
        );
    }

    #[test]
    fn test_scan_root_dir() {
        let (_temp, storage) = storage_with(&[("index.json", "{}"), ("a.mdx", "")]);
        assert_eq!(storage.scan("", "*.json").unwrap(), ["index.json"]);
    }

    #[test]
    fn test_scan_missing_dir_is_empty() {
        let (_temp, storage) = storage_with(&[]);
        assert!(storage.scan("posts", "*.mdx").unwrap().is_empty());
    }

    #[test]
    fn test_scan_invalid_pattern() {
        let (_temp, storage) = storage_with(&[]);
        let err = storage.scan("posts", "[").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::InvalidPattern);
    }

    #[test]
    fn test_read_and_exists() {
        let (_temp, storage) = storage_with(&[("posts/a.mdx", "# A\n")]);
        assert_eq!(storage.read("posts/a.mdx").unwrap(), "# A\n");
        assert!(storage.exists("posts/a.mdx"));
        assert!(!storage.exists("posts"));
        assert!(!storage.exists("posts/b.mdx"));
    }

    #[test]
    fn test_read_missing() {
        let (_temp, storage) = storage_with(&[]);
        let err = storage.read("posts/a.mdx").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.backend, Some("Fs"));
    }

    #[test]
    fn test_write_creates_parents() {
        let (temp, storage) = storage_with(&[]);
        storage.write("pages/about/index.mdx", "About\n").unwrap();
        assert_eq!(
            fs::read_to_string(temp.path().join("pages/about/index.mdx")).unwrap(),
            "About\n"
        );
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let (_temp, storage) = storage_with(&[]);
        for path in ["../secret", "posts/../../x", "/etc/passwd"] {
            let err = storage.read(path).unwrap_err();
            assert_eq!(err.kind, StorageErrorKind::InvalidPath, "{path}");
            assert!(!storage.exists(path));
        }
        assert!(storage.write("../x", "").is_err());
    }

    #[test]
    fn test_mtime() {
        let (_temp, storage) = storage_with(&[("a.mdx", "")]);
        assert!(storage.mtime("a.mdx").unwrap() > 0.0);
        assert!(storage.mtime("b.mdx").unwrap_err().is_not_found());
    }
}
