//! Document render pipeline.

use crate::component::ComponentDescriptor;
use crate::converter::{ConversionContext, MarkdownConverter, PulldownConverter};
use crate::error::RenderError;
use crate::extract::TagExtractor;
use crate::footnotes::{FootnoteIndex, FootnoteIndexer};
use crate::placeholder::PlaceholderMap;
use crate::refine::HtmlRefiner;

/// Result of rendering one document body.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RenderArtifact {
    /// Refined HTML with component markers in place of custom tags.
    pub html: String,
    /// Extracted components in document order. Spans locate each
    /// component's placeholder in the text handed to the converter.
    pub components: Vec<ComponentDescriptor>,
    /// Table of contents HTML, empty when the document has no headings.
    pub toc: String,
    pub footnotes: FootnoteIndex,
}

/// Renders document bodies into [`RenderArtifact`]s.
///
/// Pipeline: extract custom tags, swap them for placeholders, convert
/// markdown with a fresh [`ConversionContext`], refine the HTML, swap
/// placeholders for component markers, index footnotes.
///
/// A renderer holds no per-document state and can be shared between threads
/// when its converter can.
///
/// # Example
///
/// ```
/// use mdx_renderer::DocumentRenderer;
///
/// let renderer = DocumentRenderer::new();
/// let artifact = renderer
///     .render("# Sales\n\n<Chart type=\"bar\" />\n\nGrowth was strong.")
///     .unwrap();
///
/// assert_eq!(artifact.components.len(), 1);
/// assert!(artifact.html.contains(r#"data-component-id="component_0""#));
/// assert!(artifact.toc.contains("#sales"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct DocumentRenderer<C = PulldownConverter> {
    extractor: TagExtractor,
    converter: C,
    refiner: HtmlRefiner,
    footnotes: FootnoteIndexer,
}

impl DocumentRenderer<PulldownConverter> {
    /// Create a renderer using the default converter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: MarkdownConverter> DocumentRenderer<C> {
    /// Create a renderer with a custom converter.
    #[must_use]
    pub fn with_converter(converter: C) -> Self {
        Self {
            extractor: TagExtractor::new(),
            converter,
            refiner: HtmlRefiner::new(),
            footnotes: FootnoteIndexer::new(),
        }
    }

    #[must_use]
    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Render a document body (metadata header already removed).
    pub fn render(&self, raw: &str) -> Result<RenderArtifact, RenderError> {
        let mut components = self.extractor.extract(raw);
        let (text, placeholders) = PlaceholderMap::insert(raw, &mut components)?;

        let mut context = ConversionContext::new();
        let html = self.converter.convert(&text, &mut context)?;

        let html = self.refiner.refine(&html);
        let toc = self.refiner.refine_toc(&context.toc_html());
        let html = placeholders.resolve(&html);
        let footnotes = self.footnotes.index(&html);

        tracing::debug!(
            components = components.len(),
            headings = context.toc().len(),
            footnotes = footnotes.len(),
            "Rendered document"
        );

        Ok(RenderArtifact {
            html,
            components,
            toc,
            footnotes,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::error::ConvertError;
    use crate::placeholder::placeholder_token;

    static_assertions::assert_impl_all!(DocumentRenderer: Send, Sync);

    const DOC: &str = r#"# Quarterly Report

Revenue grew[^q] this quarter.

<Chart type="line" data={ {series: [1, 2, 3], labels: ['a', 'b', 'c']} } />

## Details

<Callout kind="info">
  Numbers are **unaudited**.
</Callout>

![Revenue chart](revenue.png)

Figure 1: Revenue by month

[^q]: Compared with the previous quarter.
"#;

    #[test]
    fn test_render_full_document() {
        let artifact = DocumentRenderer::new().render(DOC).unwrap();

        let names: Vec<_> = artifact.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Chart", "Callout"]);
        assert_eq!(
            artifact.components[0].props["data"],
            json!({"series": [1, 2, 3], "labels": ["a", "b", "c"]})
        );
        assert_eq!(
            artifact.components[1].children.as_deref(),
            Some("Numbers are **unaudited**.")
        );

        assert!(artifact.html.contains(
            r#"<div class="mdx-component" data-component-id="component_0"></div>"#
        ));
        assert!(artifact.html.contains(
            r#"<div class="mdx-component" data-component-id="component_1"></div>"#
        ));
        assert!(!artifact.html.contains("<!--COMPONENT_"));
        assert!(artifact.html.contains(r#"<figure class="blog-figure">"#));
        assert!(artifact.html.contains(r#"loading="lazy""#));
        assert!(!artifact.html.contains("&para;"));

        assert!(artifact.toc.starts_with(r#"<div class="toc">"#));
        assert!(artifact.toc.contains(r##"<a href="#quarterly-report">Quarterly Report</a>"##));
        assert!(artifact.toc.contains(r##"<a href="#details">Details</a>"##));

        assert_eq!(artifact.footnotes.len(), 1);
        assert_eq!(artifact.footnotes["q"].number, 1);
        assert_eq!(artifact.footnotes["q"].original_number, "1");
    }

    #[test]
    fn test_component_spans_locate_placeholders() {
        let artifact = DocumentRenderer::new().render(DOC).unwrap();
        let mut components = TagExtractor::new().extract(DOC);
        let (text, _) = PlaceholderMap::insert(DOC, &mut components).unwrap();

        for (index, component) in artifact.components.iter().enumerate() {
            let span = component.span;
            assert_eq!(&text[span.start..span.end], placeholder_token(index));
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = DocumentRenderer::new();
        assert_eq!(renderer.render(DOC).unwrap(), renderer.render(DOC).unwrap());
    }

    #[test]
    fn test_no_state_leaks_between_documents() {
        let renderer = DocumentRenderer::new();
        renderer.render("# Intro\n\nA[^1]\n\n[^1]: n").unwrap();
        let artifact = renderer.render("# Intro").unwrap();
        assert!(artifact.html.contains(r#"id="intro""#));
        assert!(!artifact.html.contains("intro_1"));
        assert!(artifact.footnotes.is_empty());
    }

    #[test]
    fn test_plain_document() {
        let artifact = DocumentRenderer::new().render("Just text.").unwrap();
        assert_eq!(artifact.html, "<p>Just text.</p>");
        assert!(artifact.components.is_empty());
        assert_eq!(artifact.toc, "");
        assert!(artifact.footnotes.is_empty());
    }

    #[test]
    fn test_lowercase_markup_passes_through() {
        let artifact = DocumentRenderer::new()
            .render("<div class=\"note\">kept</div>\n\n<Chart />")
            .unwrap();
        assert_eq!(artifact.components.len(), 1);
        assert!(artifact.html.contains(r#"<div class="note">kept</div>"#));
    }

    #[test]
    fn test_component_wrapped_in_plain_element() {
        let artifact = DocumentRenderer::new()
            .render("<div class=\"wide\">\n<Chart type=\"bar\" />\n</div>\n")
            .unwrap();
        assert_eq!(artifact.components.len(), 1);
        assert_eq!(artifact.components[0].name, "Chart");
        assert!(artifact.html.contains(r#"<div class="wide">"#));
        assert!(artifact.html.contains(
            r#"<div class="mdx-component" data-component-id="component_0"></div>"#
        ));
        assert!(!artifact.html.contains("<Chart"));
    }

    #[test]
    fn test_malformed_tag_kept_as_text() {
        let artifact = DocumentRenderer::new()
            .render("Before <Chart type=\"bar\" after")
            .unwrap();
        assert!(artifact.components.is_empty());
        assert!(artifact.html.contains("Before"));
        assert!(artifact.html.contains("after"));
    }

    struct FailingConverter;

    impl MarkdownConverter for FailingConverter {
        fn convert(
            &self,
            _markdown: &str,
            _context: &mut ConversionContext,
        ) -> Result<String, ConvertError> {
            Err(ConvertError::new("unsupported input"))
        }
    }

    #[test]
    fn test_converter_failure_fails_render() {
        let renderer = DocumentRenderer::with_converter(FailingConverter);
        let err = renderer.render("text").unwrap_err();
        assert!(matches!(err, RenderError::Convert(_)));
    }

    struct EchoConverter;

    impl MarkdownConverter for EchoConverter {
        fn convert(
            &self,
            markdown: &str,
            _context: &mut ConversionContext,
        ) -> Result<String, ConvertError> {
            Ok(format!("<p>{markdown}</p>"))
        }
    }

    #[test]
    fn test_custom_converter_output_is_refined_and_resolved() {
        let renderer = DocumentRenderer::with_converter(EchoConverter);
        let artifact = renderer.render("<Map zoom={4} />").unwrap();
        assert_eq!(
            artifact.html,
            r#"<p><div class="mdx-component" data-component-id="component_0"></div></p>"#
        );
        assert_eq!(artifact.toc, "");
    }
}
