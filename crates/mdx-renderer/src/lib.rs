//! Render pipeline for markdown documents with embedded components.
//!
//! Documents mix markdown with capitalized custom tags such as
//! `<Chart type="bar" data={[1, 2, 3]} />`. The [`DocumentRenderer`] turns
//! one document body into a [`RenderArtifact`]: refined HTML with component
//! markers, the extracted component list, a table of contents and a footnote
//! index.
//!
//! # Architecture
//!
//! Each stage is a separate type so it can be used and tested on its own:
//! - [`TagExtractor`] and [`PropParser`]: find custom tags and decode attributes
//! - [`PlaceholderMap`]: swap tags for comment tokens and back for markers
//! - [`MarkdownConverter`]: markdown to HTML, [`PulldownConverter`] by default
//! - [`HtmlRefiner`]: cleanup and presentation passes over converted HTML
//! - [`FootnoteIndexer`]: footnote reference index from finished HTML
//!
//! [`DerivedMetadataCalculator`] computes reading time and excerpts from the
//! raw body and is independent of rendering.
//!
//! # Example
//!
//! ```
//! use mdx_renderer::DocumentRenderer;
//!
//! let artifact = DocumentRenderer::new()
//!     .render("# Hello\n\n<Callout kind=\"tip\">Read me</Callout>")
//!     .unwrap();
//!
//! assert_eq!(artifact.components[0].name, "Callout");
//! assert_eq!(artifact.components[0].children.as_deref(), Some("Read me"));
//! ```

mod component;
mod converter;
mod derived;
mod error;
mod extract;
mod footnotes;
mod placeholder;
mod props;
mod refine;
mod renderer;
mod replacements;

pub use component::{ComponentDescriptor, Props, Span};
pub use converter::{
    ConversionContext, Extensions, MarkdownConverter, PulldownConverter, TocEntry, escape_html,
    render_toc, slugify,
};
pub use derived::{
    DEFAULT_EXCERPT_MAX_LENGTH, DEFAULT_WORDS_PER_MINUTE, DerivedMetadata,
    DerivedMetadataCalculator, excerpt, word_count,
};
pub use error::{ConvertError, RenderError};
pub use extract::TagExtractor;
pub use footnotes::{FootnoteIndex, FootnoteIndexer, FootnoteRef};
pub use placeholder::{PlaceholderMap, component_marker, placeholder_token};
pub use props::PropParser;
pub use refine::HtmlRefiner;
pub use renderer::{DocumentRenderer, RenderArtifact};
pub use replacements::Replacements;
