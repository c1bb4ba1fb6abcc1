//! Render pipeline errors.

use crate::component::Span;

/// Error returned by a [`MarkdownConverter`](crate::MarkdownConverter).
#[derive(Debug, thiserror::Error)]
#[error("Markdown conversion failed: {message}")]
pub struct ConvertError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ConvertError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

/// Error returned by [`DocumentRenderer::render`](crate::DocumentRenderer::render).
///
/// Malformed tags and attributes are not errors; they pass through as text.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A component span does not fit the text it is applied to.
    #[error("Invalid span {}..{} for component {id} in text of length {len}", span.start, span.end)]
    InvalidSpan { id: String, span: Span, len: usize },

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_invalid_span_display() {
        let err = RenderError::InvalidSpan {
            id: "component_2".to_owned(),
            span: Span::new(10, 40),
            len: 20,
        };
        assert_eq!(
            err.to_string(),
            "Invalid span 10..40 for component component_2 in text of length 20"
        );
    }

    #[test]
    fn test_convert_error_source() {
        let io = std::io::Error::other("boom");
        let err = RenderError::from(ConvertError::new("bad input").with_source(io));
        assert_eq!(err.to_string(), "Markdown conversion failed: bad input");
        assert!(err.source().is_some_and(|s| s.to_string() == "boom"));
    }
}
