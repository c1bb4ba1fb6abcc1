//! Storage trait.

use crate::error::StorageError;

/// Read and write access to content files.
///
/// Paths are `/`-separated and relative to the content root.
pub trait Storage: Send + Sync {
    /// List files directly inside `dir` whose file name matches the glob
    /// `pattern`, as full relative paths in sorted order.
    ///
    /// A missing directory yields an empty list.
    fn scan(&self, dir: &str, pattern: &str) -> Result<Vec<String>, StorageError>;

    fn read(&self, path: &str) -> Result<String, StorageError>;

    /// Replace the content at `path`, creating parent directories as needed.
    fn write(&self, path: &str, content: &str) -> Result<(), StorageError>;

    /// Whether a file exists at `path`. Errors count as missing.
    fn exists(&self, path: &str) -> bool;

    /// Modification time in seconds since the Unix epoch.
    fn mtime(&self, path: &str) -> Result<f64, StorageError>;
}

/// Join a directory and a file name with `/`.
///
/// ```
/// assert_eq!(mdx_storage::join_path("posts", "a.mdx"), "posts/a.mdx");
/// assert_eq!(mdx_storage::join_path("posts/", "a.mdx"), "posts/a.mdx");
/// assert_eq!(mdx_storage::join_path("", "a.mdx"), "a.mdx");
/// ```
#[must_use]
pub fn join_path(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        name.to_owned()
    } else {
        format!("{dir}/{name}")
    }
}
