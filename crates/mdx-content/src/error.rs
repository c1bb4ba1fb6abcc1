//! Content error types.

use mdx_meta::FrontMatterError;
use mdx_renderer::RenderError;
use mdx_storage::StorageError;

/// Error from a document-level operation.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// Auxiliary data file does not exist.
    #[error("Data file not found: {0}")]
    DataNotFound(String),

    /// Auxiliary data file is not valid JSON.
    #[error("Invalid JSON in data file {name}: {source}")]
    Data {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize content index: {0}")]
    Index(#[source] serde_json::Error),
}
