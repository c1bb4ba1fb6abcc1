//! CLI error types.

use mdx_config::ConfigError;
use mdx_content::ContentError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Content(#[from] ContentError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Some documents of a batch failed; details were already reported.
    #[error("{0} document(s) failed")]
    DocumentsFailed(usize),
}
