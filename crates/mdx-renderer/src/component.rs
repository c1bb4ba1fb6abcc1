//! Component descriptors extracted from document text.

use serde_json::{Map, Value};

/// Typed props of a component, keyed by attribute name.
pub type Props = Map<String, Value>;

/// Half-open byte range `[start, end)` into a document string.
///
/// Both ends always fall on `char` boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Move both ends by a signed byte delta.
    #[must_use]
    pub(crate) fn shifted(self, delta: isize) -> Self {
        Self {
            start: self.start.saturating_add_signed(delta),
            end: self.end.saturating_add_signed(delta),
        }
    }
}

/// A custom tag found in a document.
///
/// Produced by [`TagExtractor`](crate::TagExtractor). The `span` initially
/// locates the tag in the raw text; after
/// [`PlaceholderMap::insert`](crate::PlaceholderMap::insert) it locates the
/// placeholder that replaced it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ComponentDescriptor {
    /// Stable identifier, `component_<index>`.
    pub id: String,
    /// Tag name as written (upper-case initial).
    pub name: String,
    /// Parsed attributes.
    pub props: Props,
    /// Trimmed inner text for paired tags; `None` for self-closing or empty tags.
    pub children: Option<String>,
    pub span: Span,
}

impl ComponentDescriptor {
    /// Identifier for the component at `index` in document order.
    #[must_use]
    pub fn id_for(index: usize) -> String {
        format!("component_{index}")
    }

    /// Look up a prop value.
    #[must_use]
    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }
}
