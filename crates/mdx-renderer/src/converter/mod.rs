//! Markdown conversion boundary.
//!
//! The render pipeline treats markdown-to-HTML conversion as a pluggable
//! [`MarkdownConverter`]. Converters hold no per-document state: everything a
//! conversion accumulates (table of contents, heading ids, footnote numbering)
//! lives in a [`ConversionContext`] that the caller creates fresh for every
//! document, so nothing leaks from one document into the next.

mod abbr;
mod pulldown;
mod state;
mod toc;

use std::collections::HashMap;

pub use pulldown::PulldownConverter;
pub use state::{escape_html, slugify};
pub use toc::{TocEntry, render_toc};

use crate::error::ConvertError;

/// Converts placeholder-bearing markdown to HTML.
///
/// Raw HTML, including `<!--COMPONENT_n-->` placeholders, must pass through
/// unchanged.
pub trait MarkdownConverter: Send + Sync {
    /// Convert `markdown` to HTML, recording side artifacts in `context`.
    fn convert(
        &self,
        markdown: &str,
        context: &mut ConversionContext,
    ) -> Result<String, ConvertError>;
}

/// Syntax extensions enabled on a converter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Extensions {
    pub tables: bool,
    pub footnotes: bool,
    pub definition_lists: bool,
    pub abbreviations: bool,
    /// Render single newlines inside paragraphs as `<br />`.
    pub line_breaks: bool,
    /// `# Heading {#id .class}` attribute blocks.
    pub heading_attributes: bool,
    pub strikethrough: bool,
}

impl Extensions {
    /// Version of the extension set returned by [`Extensions::all`].
    ///
    /// Bumped whenever the default set or its HTML output changes.
    pub const VERSION: u32 = 1;

    #[must_use]
    pub const fn all() -> Self {
        Self {
            tables: true,
            footnotes: true,
            definition_lists: true,
            abbreviations: true,
            line_breaks: true,
            heading_attributes: true,
            strikethrough: true,
        }
    }

    #[must_use]
    pub const fn none() -> Self {
        Self {
            tables: false,
            footnotes: false,
            definition_lists: false,
            abbreviations: false,
            line_breaks: false,
            heading_attributes: false,
            strikethrough: false,
        }
    }
}

impl Default for Extensions {
    fn default() -> Self {
        Self::all()
    }
}

/// Per-document conversion state.
///
/// Create one with [`ConversionContext::new`] for every conversion.
#[derive(Debug, Default)]
pub struct ConversionContext {
    toc: Vec<TocEntry>,
    heading_ids: HashMap<String, usize>,
    /// Footnote labels in order of first reference.
    footnote_order: Vec<String>,
    footnote_refs: HashMap<String, usize>,
}

impl ConversionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Headings seen so far, in document order.
    #[must_use]
    pub fn toc(&self) -> &[TocEntry] {
        &self.toc
    }

    /// Table of contents as HTML; empty when the document has no headings.
    #[must_use]
    pub fn toc_html(&self) -> String {
        render_toc(&self.toc)
    }

    /// Footnote labels in numbering order.
    #[must_use]
    pub fn footnote_labels(&self) -> &[String] {
        &self.footnote_order
    }

    pub fn push_toc(&mut self, entry: TocEntry) {
        self.toc.push(entry);
    }

    /// Reserve a unique heading id based on `base`.
    ///
    /// Repeats get `_1`, `_2`, ... suffixes. An empty base becomes `section`.
    pub fn unique_heading_id(&mut self, base: &str) -> String {
        let base = if base.is_empty() { "section" } else { base };
        let mut candidate = base.to_owned();
        let mut n = self.heading_ids.get(base).copied().unwrap_or(0);
        while self.heading_ids.contains_key(&candidate) {
            n += 1;
            candidate = format!("{base}_{n}");
        }
        self.heading_ids.insert(base.to_owned(), n);
        self.heading_ids.entry(candidate.clone()).or_insert(0);
        candidate
    }

    /// Record a reference to footnote `label`.
    ///
    /// Returns the footnote's display number (1-based, by first reference)
    /// and how many times it has now been referenced.
    pub fn reference_footnote(&mut self, label: &str) -> (usize, usize) {
        let count = self.footnote_refs.entry(label.to_owned()).or_insert(0);
        *count += 1;
        let occurrence = *count;
        if occurrence == 1 {
            self.footnote_order.push(label.to_owned());
        }
        (self.footnote_number(label).unwrap_or(0), occurrence)
    }

    /// Display number of a referenced footnote.
    #[must_use]
    pub fn footnote_number(&self, label: &str) -> Option<usize> {
        self.footnote_order
            .iter()
            .position(|l| l == label)
            .map(|i| i + 1)
    }

    /// How many times footnote `label` was referenced.
    #[must_use]
    pub fn footnote_reference_count(&self, label: &str) -> usize {
        self.footnote_refs.get(label).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_heading_ids() {
        let mut ctx = ConversionContext::new();
        assert_eq!(ctx.unique_heading_id("intro"), "intro");
        assert_eq!(ctx.unique_heading_id("intro"), "intro_1");
        assert_eq!(ctx.unique_heading_id("intro"), "intro_2");
        assert_eq!(ctx.unique_heading_id("other"), "other");
    }

    #[test]
    fn test_unique_heading_id_avoids_existing_suffix() {
        let mut ctx = ConversionContext::new();
        assert_eq!(ctx.unique_heading_id("a_1"), "a_1");
        assert_eq!(ctx.unique_heading_id("a"), "a");
        assert_eq!(ctx.unique_heading_id("a"), "a_2");
    }

    #[test]
    fn test_empty_heading_id() {
        let mut ctx = ConversionContext::new();
        assert_eq!(ctx.unique_heading_id(""), "section");
        assert_eq!(ctx.unique_heading_id(""), "section_1");
    }

    #[test]
    fn test_footnote_numbering() {
        let mut ctx = ConversionContext::new();
        assert_eq!(ctx.reference_footnote("note"), (1, 1));
        assert_eq!(ctx.reference_footnote("2"), (2, 1));
        assert_eq!(ctx.reference_footnote("note"), (1, 2));
        assert_eq!(ctx.footnote_labels(), ["note", "2"]);
        assert_eq!(ctx.footnote_number("missing"), None);
        assert_eq!(ctx.footnote_reference_count("note"), 2);
    }

    #[test]
    fn test_fresh_context_is_empty() {
        let ctx = ConversionContext::new();
        assert!(ctx.toc().is_empty());
        assert_eq!(ctx.toc_html(), "");
        assert!(ctx.footnote_labels().is_empty());
    }

    #[test]
    fn test_extensions_default_is_all() {
        assert_eq!(Extensions::default(), Extensions::all());
        assert_ne!(Extensions::none(), Extensions::all());
    }
}
