//! Storage error types.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// What went wrong, independent of backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    NotFound,
    PermissionDenied,
    AlreadyExists,
    /// Path escapes the content root or is otherwise unusable.
    InvalidPath,
    /// File name pattern passed to `scan` is not a valid glob.
    InvalidPattern,
    Timeout,
    Other,
}

impl StorageErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "Not found",
            Self::PermissionDenied => "Permission denied",
            Self::AlreadyExists => "Already exists",
            Self::InvalidPath => "Invalid path",
            Self::InvalidPattern => "Invalid pattern",
            Self::Timeout => "Timeout",
            Self::Other => "Error",
        }
    }
}

/// Whether repeating the operation may succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorStatus {
    #[default]
    Permanent,
    Temporary,
}

/// Storage error with semantic kind, retry status and context.
///
/// Displayed as `[Backend] Kind: source (path: p)`, omitting missing parts.
#[derive(Debug)]
pub struct StorageError {
    pub kind: StorageErrorKind,
    pub status: ErrorStatus,
    pub path: Option<PathBuf>,
    /// Backend identifier such as `"Fs"` or `"Mock"`.
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            status: ErrorStatus::Permanent,
            path: None,
            backend: None,
            source: None,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    #[must_use]
    pub fn invalid_path(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::InvalidPath).with_path(path)
    }

    #[must_use]
    pub fn invalid_pattern(err: glob::PatternError) -> Self {
        Self::new(StorageErrorKind::InvalidPattern).with_source(err)
    }

    /// Classify an I/O error. Timeouts are temporary, everything else permanent.
    #[must_use]
    pub fn io(err: io::Error, path: impl Into<PathBuf>) -> Self {
        let (kind, status) = match err.kind() {
            io::ErrorKind::NotFound => (StorageErrorKind::NotFound, ErrorStatus::Permanent),
            io::ErrorKind::PermissionDenied => {
                (StorageErrorKind::PermissionDenied, ErrorStatus::Permanent)
            }
            io::ErrorKind::AlreadyExists => {
                (StorageErrorKind::AlreadyExists, ErrorStatus::Permanent)
            }
            io::ErrorKind::TimedOut => (StorageErrorKind::Timeout, ErrorStatus::Temporary),
            _ => (StorageErrorKind::Other, ErrorStatus::Permanent),
        };
        Self::new(kind)
            .with_status(status)
            .with_path(path)
            .with_source(err)
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }

    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }
        f.write_str(self.kind.as_str())?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_new_defaults() {
        let err = StorageError::new(StorageErrorKind::Other);
        assert_eq!(err.status, ErrorStatus::Permanent);
        assert!(err.path.is_none());
        assert!(err.backend.is_none());
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_io_not_found() {
        let err = StorageError::io(io::Error::from(io::ErrorKind::NotFound), "posts/a.mdx");
        assert!(err.is_not_found());
        assert_eq!(err.status, ErrorStatus::Permanent);
        assert_eq!(err.path.as_deref(), Some(Path::new("posts/a.mdx")));
        assert!(err.downcast_source::<io::Error>().is_some());
    }

    #[test]
    fn test_io_timeout_is_temporary() {
        let err = StorageError::io(io::Error::from(io::ErrorKind::TimedOut), "x");
        assert_eq!(err.kind, StorageErrorKind::Timeout);
        assert_eq!(err.status, ErrorStatus::Temporary);
    }

    #[test]
    fn test_io_permission_denied() {
        let err = StorageError::io(io::Error::from(io::ErrorKind::PermissionDenied), "x");
        assert_eq!(err.kind, StorageErrorKind::PermissionDenied);
    }

    #[test]
    fn test_invalid_pattern() {
        let Err(pattern_err) = glob::Pattern::new("[") else {
            panic!("pattern should be invalid");
        };
        let err = StorageError::invalid_pattern(pattern_err);
        assert_eq!(err.kind, StorageErrorKind::InvalidPattern);
        assert!(err.downcast_source::<glob::PatternError>().is_some());
    }

    #[test]
    fn test_display_minimal() {
        assert_eq!(StorageError::not_found("a.mdx").to_string(), "Not found (path: a.mdx)");
    }

    #[test]
    fn test_display_full() {
        let err = StorageError::new(StorageErrorKind::NotFound)
            .with_backend("Fs")
            .with_path("content/a.mdx")
            .with_source(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        assert_eq!(
            err.to_string(),
            "[Fs] Not found: no such file (path: content/a.mdx)"
        );
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StorageError>();
    }
}
