//! Custom tag extraction.
//!
//! Finds `<Name attrs/>` and `<Name attrs>children</Name>` regions in raw
//! document text. Only names starting with an upper-case letter become
//! components; plain markup such as `<div>` is stepped over and left in the
//! text for the markdown converter.

use crate::component::{ComponentDescriptor, Span};
use crate::props::PropParser;

/// Scans raw text for custom tags.
///
/// # Example
///
/// ```
/// use mdx_renderer::TagExtractor;
///
/// let text = r#"Intro <Chart type="bar" height={300} /> outro"#;
/// let components = TagExtractor::new().extract(text);
///
/// assert_eq!(components.len(), 1);
/// assert_eq!(components[0].id, "component_0");
/// assert_eq!(components[0].name, "Chart");
/// assert_eq!(components[0].props["height"], 300);
/// assert_eq!(&text[components[0].span.start..components[0].span.end], r#"<Chart type="bar" height={300} />"#);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TagExtractor {
    props: PropParser,
}

/// A tag-shaped region before the case check.
struct RawTag<'a> {
    name: &'a str,
    attrs: &'a str,
    children: Option<&'a str>,
    span: Span,
    /// Offset just past the opening tag's `>`.
    open_end: usize,
}

impl TagExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract custom tags in document order.
    ///
    /// Spans are byte offsets into `text`, ascending and non-overlapping.
    /// Unterminated tags are not matched and stay in the text as literals.
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<ComponentDescriptor> {
        let mut components = Vec::new();
        let mut pos = 0;

        while let Some(offset) = text[pos..].find('<') {
            let start = pos + offset;
            let Some(tag) = match_tag(text, start) else {
                pos = start + 1;
                continue;
            };
            if !tag.name.starts_with(|c: char| c.is_uppercase()) {
                // Plain elements pass through; their content is still scanned.
                tracing::trace!(name = tag.name, start, "Skipping plain markup tag");
                pos = tag.open_end;
                continue;
            }
            pos = tag.span.end;

            components.push(ComponentDescriptor {
                id: ComponentDescriptor::id_for(components.len()),
                name: tag.name.to_owned(),
                props: self.props.parse(tag.attrs),
                children: tag
                    .children
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_owned),
                span: tag.span,
            });
        }

        components
    }
}

/// Match a tag starting at the `<` at `start`.
fn match_tag(text: &str, start: usize) -> Option<RawTag<'_>> {
    let rest = &text[start + 1..];
    let name_len = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let name = &rest[..name_len];
    let after_name = start + 1 + name_len;

    // Attributes must be separated from the name by whitespace.
    let next = text[after_name..].chars().next()?;
    if !(next.is_whitespace() || next == '/' || next == '>') {
        return None;
    }

    let gt = find_tag_end(text, after_name)?;
    let region = &text[after_name..gt];
    let trimmed = region.trim_end();

    if let Some(attrs) = trimmed.strip_suffix('/') {
        return Some(RawTag {
            name,
            attrs: attrs.trim(),
            children: None,
            span: Span::new(start, gt + 1),
            open_end: gt + 1,
        });
    }

    let close = format!("</{name}>");
    let inner_start = gt + 1;
    let inner_len = text[inner_start..].find(&close)?;
    let inner_end = inner_start + inner_len;

    Some(RawTag {
        name,
        attrs: region.trim(),
        children: Some(&text[inner_start..inner_end]),
        span: Span::new(start, inner_end + close.len()),
        open_end: inner_start,
    })
}

/// Find the `>` closing an opening tag.
///
/// Quoted strings and brace expressions may contain `>`; they are skipped.
fn find_tag_end(text: &str, from: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (i, c) in text[from..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '{') => depth += 1,
            (None, '}') => depth = depth.saturating_sub(1),
            (None, '>') if depth == 0 => return Some(from + i),
            _ => {}
        }
    }

    None
}
