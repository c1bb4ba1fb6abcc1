//! HTML refinement passes.
//!
//! Converted HTML goes through a fixed, ordered list of pattern-based
//! rewrites. Every rewrite is idempotent, so refining already refined HTML
//! changes nothing:
//!
//! 1. Drop empty paragraphs
//! 2. Put block elements (`blockquote`, `pre`, `div`, lists, `table`) on their own line
//! 3. Surround headings with a blank line
//! 4. Collapse runs of blank lines
//! 5. Add `alt=""`, `loading="lazy"` and `decoding="async"` to images missing them
//! 6. Add `role="blockquote"` to blockquotes
//! 7. Copy the code language onto `<pre data-language="...">`
//! 8. Promote image + caption paragraphs to `<figure>` and mark standalone captions
//! 9. Strip the permalink glyph from heading permalinks and the table of contents

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static EMPTY_PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>\s*</p>").unwrap());

static PARAGRAPH_BEFORE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</p>\s*<(blockquote|pre|div|ul|ol|table)\b").unwrap());

static BLOCK_BEFORE_PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</(blockquote|pre|div|ul|ol|table)>\s*<p>").unwrap());

static PARAGRAPH_BEFORE_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</p>\s*<(h[1-6])\b").unwrap());

static HEADING_BEFORE_PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</(h[1-6])>\s*<p>").unwrap());

static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

static IMG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<img\b[^>]*>").unwrap());

static ALT_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\salt(?:\s*=|\s|/|>)").unwrap());

static LOADING_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\sloading\s*=").unwrap());

static DECODING_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\sdecoding\s*=").unwrap());

static CODE_LANGUAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<pre><code class="language-([^"\s]+)([^"]*)"([^>]*)>"#).unwrap()
});

static FIGURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<p>\s*(<img\b[^>]*>)\s*</p>\s*<p>([^<]*(?i:figure|source)[^<]*)</p>").unwrap()
});

static CAPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>([^<]*(?i:figure|source)[^<]*)</p>").unwrap());

static FIGURE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<figure\b.*?</figure>").unwrap());

static PERMALINK_GLYPH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(<a class="heading-permalink"[^>]*>)\s*(?:&para;|&#182;|¶)\s*(</a>)"#).unwrap()
});

static TOC_GLYPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&para;|&#182;|¶").unwrap());

/// Applies the refinement passes to converted HTML.
///
/// # Example
///
/// ```
/// use mdx_renderer::HtmlRefiner;
///
/// let refiner = HtmlRefiner::new();
/// let html = refiner.refine("<p></p><blockquote>\n<p>Quote</p>\n</blockquote>");
///
/// assert_eq!(html, "<blockquote role=\"blockquote\">\n<p>Quote</p>\n</blockquote>");
/// assert_eq!(refiner.refine(&html), html);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlRefiner;

impl HtmlRefiner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Run every pass over `html` in order and trim the result.
    #[must_use]
    pub fn refine(&self, html: &str) -> String {
        let html = strip_empty_paragraphs(html);
        let html = separate_blocks(&html);
        let html = separate_headings(&html);
        let html = collapse_blank_lines(&html);
        let html = enrich_images(&html);
        let html = tag_blockquotes(&html);
        let html = tag_code_languages(&html);
        let html = promote_figures(&html);
        let html = mark_standalone_captions(&html);
        let html = strip_permalink_glyphs(&html);
        html.trim().to_owned()
    }

    /// Remove permalink glyphs from a rendered table of contents.
    #[must_use]
    pub fn refine_toc(&self, toc: &str) -> String {
        TOC_GLYPH_RE.replace_all(toc, "").trim().to_owned()
    }
}

fn strip_empty_paragraphs(html: &str) -> String {
    EMPTY_PARAGRAPH_RE.replace_all(html, "").into_owned()
}

fn separate_blocks(html: &str) -> String {
    let html = PARAGRAPH_BEFORE_BLOCK_RE.replace_all(html, "</p>\n<$1");
    BLOCK_BEFORE_PARAGRAPH_RE
        .replace_all(&html, "</$1>\n<p>")
        .into_owned()
}

fn separate_headings(html: &str) -> String {
    let html = PARAGRAPH_BEFORE_HEADING_RE.replace_all(html, "</p>\n\n<$1");
    HEADING_BEFORE_PARAGRAPH_RE
        .replace_all(&html, "</$1>\n\n<p>")
        .into_owned()
}

fn collapse_blank_lines(html: &str) -> String {
    BLANK_LINES_RE.replace_all(html, "\n\n").into_owned()
}

fn enrich_images(html: &str) -> String {
    IMG_RE
        .replace_all(html, |caps: &Captures| {
            let tag = &caps[0];
            let mut missing = String::new();
            if !ALT_ATTR_RE.is_match(tag) {
                missing.push_str(r#" alt="""#);
            }
            if !LOADING_ATTR_RE.is_match(tag) {
                missing.push_str(r#" loading="lazy""#);
            }
            if !DECODING_ATTR_RE.is_match(tag) {
                missing.push_str(r#" decoding="async""#);
            }
            if missing.is_empty() {
                return tag.to_owned();
            }

            let (head, close) = match tag.strip_suffix("/>") {
                Some(head) => (head.trim_end(), " />"),
                None => (tag[..tag.len() - 1].trim_end(), ">"),
            };
            format!("{head}{missing}{close}")
        })
        .into_owned()
}

fn tag_blockquotes(html: &str) -> String {
    html.replace("<blockquote>", r#"<blockquote role="blockquote">"#)
}

fn tag_code_languages(html: &str) -> String {
    CODE_LANGUAGE_RE
        .replace_all(
            html,
            r#"<pre data-language="$1"><code class="language-$1$2"$3>"#,
        )
        .into_owned()
}

/// Byte ranges of existing `<figure>` elements.
fn figure_ranges(html: &str) -> Vec<Range<usize>> {
    FIGURE_BLOCK_RE.find_iter(html).map(|m| m.range()).collect()
}

fn inside_any(ranges: &[Range<usize>], pos: usize) -> bool {
    ranges.iter().any(|r| r.contains(&pos))
}

fn promote_figures(html: &str) -> String {
    let figures = figure_ranges(html);
    let mut promoted = 0usize;
    let result = FIGURE_RE.replace_all(html, |caps: &Captures| {
        let whole = caps.get(0).map_or(0, |m| m.start());
        if inside_any(&figures, whole) {
            return caps[0].to_owned();
        }
        promoted += 1;
        format!(
            "<figure class=\"blog-figure\">\n    {}\n    <figcaption class=\"blog-figure-caption\">{}</figcaption>\n</figure>",
            &caps[1],
            caps[2].trim()
        )
    });
    if promoted > 0 {
        tracing::debug!(count = promoted, "Promoted image captions to figures");
    }
    result.into_owned()
}

/// Mark caption-like paragraphs that are followed by a non-paragraph element.
fn mark_standalone_captions(html: &str) -> String {
    let figures = figure_ranges(html);
    let mut out = String::with_capacity(html.len());
    let mut last = 0;

    for caps in CAPTION_RE.captures_iter(html) {
        let Some(m) = caps.get(0) else { continue };
        if inside_any(&figures, m.start()) || !followed_by_non_paragraph(&html[m.end()..]) {
            continue;
        }
        out.push_str(&html[last..m.start()]);
        out.push_str(r#"<p class="blog-standalone-caption">"#);
        out.push_str(&caps[1]);
        out.push_str("</p>");
        last = m.end();
    }

    out.push_str(&html[last..]);
    out
}

/// Whether `rest` continues with a tag other than `<p>` or `<figure>`.
fn followed_by_non_paragraph(rest: &str) -> bool {
    let Some(tag) = rest.trim_start().strip_prefix('<') else {
        return false;
    };
    let name_len = tag
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(tag.len());
    !matches!(&tag[..name_len], "p" | "figure")
}

fn strip_permalink_glyphs(html: &str) -> String {
    PERMALINK_GLYPH_RE.replace_all(html, "$1$2").into_owned()
}
