//! Storage abstraction for MDX content.
//!
//! The [`Storage`] trait gives document-level code (loading, enrichment,
//! index generation) access to content files without touching the
//! filesystem directly. This enables:
//!
//! - **Unit testing** against [`MockStorage`] (behind the `mock` feature)
//! - **Backend flexibility** beyond the local filesystem
//!
//! # Path Convention
//!
//! All paths are `/`-separated strings relative to the content root, such as
//! `"posts/2024-01-15-launch.mdx"` or `"data/sales.json"`.
//!
//! # Example
//!
//! ```no_run
//! use mdx_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new("content");
//! for path in storage.scan("posts", "*.mdx")? {
//!     let text = storage.read(&path)?;
//!     println!("{path}: {} bytes", text.len());
//! }
//! # Ok::<(), mdx_storage::StorageError>(())
//! ```

mod error;
mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use error::{ErrorStatus, StorageError, StorageErrorKind};
pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Storage, join_path};
