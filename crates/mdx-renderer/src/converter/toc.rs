//! Table of contents rendering.

use std::fmt::Write;

use super::state::escape_html;

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// Render entries as a nested list inside `<div class="toc">`.
///
/// A deeper heading opens a nested `<ul>` inside the previous item; a
/// shallower one closes lists until a matching or shallower level is open.
/// Returns an empty string when there are no entries.
#[must_use]
pub fn render_toc(entries: &[TocEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut out = String::from("<div class=\"toc\">\n");
    let mut stack: Vec<u8> = Vec::new();

    for entry in entries {
        match stack.last() {
            None => {
                out.push_str("<ul>\n<li>");
                stack.push(entry.level);
            }
            Some(&top) if entry.level > top => {
                out.push_str("\n<ul>\n<li>");
                stack.push(entry.level);
            }
            Some(_) => {
                while stack.len() > 1 && stack.last().is_some_and(|&top| entry.level < top) {
                    stack.pop();
                    out.push_str("</li>\n</ul>\n");
                }
                if stack.last().is_some_and(|&top| entry.level > top) {
                    out.push_str("<ul>\n<li>");
                    stack.push(entry.level);
                } else {
                    out.push_str("</li>\n<li>");
                }
            }
        }
        write!(
            out,
            r##"<a href="#{}">{}</a>"##,
            escape_html(&entry.id),
            escape_html(&entry.title)
        )
        .unwrap();
    }

    for _ in &stack {
        out.push_str("</li>\n</ul>\n");
    }
    out.push_str("</div>");
    out
}
