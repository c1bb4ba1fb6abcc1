//! Reading time and excerpt derived from raw document text.
//!
//! Both values are computed from the source, not the rendered HTML, after
//! stripping markup that is not prose.

use std::sync::LazyLock;

use regex::Regex;

/// Default reading speed.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 225;

/// Default excerpt length in characters, including the ellipsis.
pub const DEFAULT_EXCERPT_MAX_LENGTH: usize = 150;

const ELLIPSIS: &str = "...";

static FRONTMATTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n.*?\r?\n(?:---|\.\.\.)[ \t]*(?:\r?\n|\z)").unwrap()
});

static BACKTICK_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?ms)^[ \t]*```.*?^[ \t]*```[^\n]*$").unwrap());

static TILDE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?ms)^[ \t]*~~~.*?^[ \t]*~~~[^\n]*$").unwrap());

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\n]+)`").unwrap());

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());

static FOOTNOTE_DEF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\[\^[^\]]+\]:.*$").unwrap());

static FOOTNOTE_REF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\^[^\]]+\]").unwrap());

static ABBR_DEF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\*\[[^\]]+\]:.*$").unwrap());

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\](?:\([^)]*\)|\[[^\]]*\])").unwrap());

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]+").unwrap());

static RULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$").unwrap());

static BLOCKQUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:>[ \t]?)+").unwrap());

static LIST_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:[-*+]|\d+[.)])[ \t]+").unwrap());

static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{1,3}|~~|\b_{1,3}|_{1,3}\b").unwrap());

/// Reading time and excerpt for one document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedMetadata {
    /// Minutes, at least 1.
    pub reading_time: u32,
    pub excerpt: String,
}

/// Computes [`DerivedMetadata`] from raw document text.
///
/// # Example
///
/// ```
/// use mdx_renderer::DerivedMetadataCalculator;
///
/// let calc = DerivedMetadataCalculator::new();
/// let derived = calc.compute_with("The quick brown fox jumps over the lazy dog", 20);
///
/// assert_eq!(derived.reading_time, 1);
/// assert_eq!(derived.excerpt, "The quick brown...");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DerivedMetadataCalculator {
    words_per_minute: u32,
    excerpt_max_length: usize,
}

impl Default for DerivedMetadataCalculator {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            excerpt_max_length: DEFAULT_EXCERPT_MAX_LENGTH,
        }
    }
}

impl DerivedMetadataCalculator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reading speed. Zero is treated as one word per minute.
    #[must_use]
    pub fn with_words_per_minute(mut self, words_per_minute: u32) -> Self {
        self.words_per_minute = words_per_minute.max(1);
        self
    }

    #[must_use]
    pub fn with_excerpt_max_length(mut self, max_length: usize) -> Self {
        self.excerpt_max_length = max_length;
        self
    }

    #[must_use]
    pub fn words_per_minute(&self) -> u32 {
        self.words_per_minute
    }

    #[must_use]
    pub fn excerpt_max_length(&self) -> usize {
        self.excerpt_max_length
    }

    /// Compute with the configured excerpt length.
    #[must_use]
    pub fn compute(&self, raw: &str) -> DerivedMetadata {
        self.compute_with(raw, self.excerpt_max_length)
    }

    /// Compute with an explicit excerpt length.
    #[must_use]
    pub fn compute_with(&self, raw: &str, excerpt_max_length: usize) -> DerivedMetadata {
        DerivedMetadata {
            reading_time: self.reading_time(raw),
            excerpt: excerpt(raw, excerpt_max_length),
        }
    }

    /// Reading time in whole minutes, rounded half to even, never below 1.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn reading_time(&self, raw: &str) -> u32 {
        let words = word_count(raw);
        let minutes = (words as f64 / f64::from(self.words_per_minute)).round_ties_even();
        (minutes as u32).max(1)
    }
}

/// Count prose words: code, markup, images and link targets are not counted.
#[must_use]
pub fn word_count(raw: &str) -> usize {
    let text = strip_common(raw);
    let text = INLINE_CODE_RE.replace_all(&text, "");
    let text = strip_inline_markup(&text);
    text.split_whitespace().count()
}

/// Plain-text excerpt of at most `max_length` characters.
///
/// Inline code keeps its content and links keep their text. Longer text is
/// cut at the last word boundary that leaves room for `...`. Limits below
/// four are raised to four so a cut excerpt always shows some text.
#[must_use]
pub fn excerpt(raw: &str, max_length: usize) -> String {
    let text = strip_common(raw);
    let text = INLINE_CODE_RE.replace_all(&text, "$1");
    let text = strip_inline_markup(&text);
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_at_word(&text, max_length)
}

/// Block-level stripping shared by word count and excerpt.
fn strip_common(raw: &str) -> String {
    let text = FRONTMATTER_RE.replace(raw, "");
    let text = BACKTICK_FENCE_RE.replace_all(&text, "");
    let text = TILDE_FENCE_RE.replace_all(&text, "");
    let text = TAG_RE.replace_all(&text, " ");
    let text = FOOTNOTE_DEF_RE.replace_all(&text, "");
    let text = ABBR_DEF_RE.replace_all(&text, "");
    let text = RULE_RE.replace_all(&text, "");
    let text = HEADING_RE.replace_all(&text, "");
    let text = BLOCKQUOTE_RE.replace_all(&text, "");
    let text = LIST_MARKER_RE.replace_all(&text, "");
    text.into_owned()
}

/// Images, footnote references, links and emphasis markers.
fn strip_inline_markup(text: &str) -> String {
    let text = IMAGE_RE.replace_all(text, "");
    let text = FOOTNOTE_REF_RE.replace_all(&text, "");
    let text = LINK_RE.replace_all(&text, "$1");
    EMPHASIS_RE.replace_all(&text, "").into_owned()
}

/// Lengths below this still keep one character before the ellipsis.
const MIN_EXCERPT_LENGTH: usize = ELLIPSIS.len() + 1;

fn truncate_at_word(text: &str, max_length: usize) -> String {
    let max_length = max_length.max(MIN_EXCERPT_LENGTH);
    if text.chars().count() <= max_length {
        return text.to_owned();
    }

    let budget = max_length - ELLIPSIS.len();
    // One extra char so a space right after the budget counts as a boundary.
    let window: String = text.chars().take(budget + 1).collect();
    let cut = match window.rfind(char::is_whitespace) {
        Some(pos) => &window[..pos],
        None => {
            let end = window
                .char_indices()
                .nth(budget)
                .map_or(window.len(), |(i, _)| i);
            &window[..end]
        }
    };

    format!("{}{ELLIPSIS}", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOX: &str = "The quick brown fox jumps over the lazy dog";

    #[test]
    fn test_excerpt_truncates_at_word_boundary() {
        let excerpt = excerpt(FOX, 20);
        assert_eq!(excerpt, "The quick brown...");
        assert!(excerpt.chars().count() <= 20);
    }

    #[test]
    fn test_excerpt_short_text_untouched() {
        assert_eq!(excerpt(FOX, 150), FOX);
        assert_eq!(excerpt(FOX, FOX.len()), FOX);
    }

    #[test]
    fn test_excerpt_boundary_right_after_budget() {
        // Budget of 15 ends exactly before a space.
        assert_eq!(excerpt(FOX, 18), "The quick brown...");
    }

    #[test]
    fn test_excerpt_tiny_limit_keeps_ellipsis() {
        for max_length in 0..=MIN_EXCERPT_LENGTH {
            assert_eq!(excerpt(FOX, max_length), "T...");
        }
        assert_eq!(excerpt("abc", 0), "abc");
        assert_eq!(excerpt(FOX, 5), "Th...");
    }

    #[test]
    fn test_excerpt_single_long_word() {
        assert_eq!(excerpt("Supercalifragilistic", 10), "Superca...");
    }

    #[test]
    fn test_excerpt_strips_markup() {
        let raw = "---\ntitle: Post\n---\n\n# Heading\n\nSome **bold** and _italic_ text with a [link](https://x.y) and `code`.\n\n![img](a.png)\n\n<Chart data={[1,2]} />\n\n```js\nignored();\n```\n";
        assert_eq!(
            excerpt(raw, 150),
            "Heading Some bold and italic text with a link and code."
        );
    }

    #[test]
    fn test_excerpt_collapses_whitespace() {
        assert_eq!(excerpt("a\n\n  b\t\tc", 150), "a b c");
    }

    #[test]
    fn test_excerpt_keeps_snake_case() {
        assert_eq!(excerpt("call my_function now", 150), "call my_function now");
    }

    #[test]
    fn test_excerpt_empty() {
        assert_eq!(excerpt("", 150), "");
        assert_eq!(excerpt("---\ntitle: x\n---\n", 150), "");
    }

    #[test]
    fn test_word_count_ignores_code_and_urls() {
        let raw = "One two [three](http://very/long/url) `inline code` four\n\n```\nlots of code words here\n```\n![alt words](img.png)";
        assert_eq!(word_count(raw), 4);
    }

    #[test]
    fn test_word_count_strips_lists_and_quotes() {
        assert_eq!(word_count("- one\n- two\n> three\n1. four\n---\n"), 4);
    }

    #[test]
    fn test_word_count_footnotes_and_abbreviations() {
        assert_eq!(
            word_count("Claim[^1] here.\n\n[^1]: The source.\n*[HTML]: Hyper Text\n"),
            2
        );
    }

    #[test]
    fn test_reading_time_minimum_one() {
        let calc = DerivedMetadataCalculator::new();
        assert_eq!(calc.reading_time(""), 1);
        assert_eq!(calc.reading_time("word"), 1);
    }

    #[test]
    fn test_reading_time_rounding() {
        let calc = DerivedMetadataCalculator::new();
        let words = |n: usize| vec!["word"; n].join(" ");
        assert_eq!(calc.reading_time(&words(450)), 2);
        assert_eq!(calc.reading_time(&words(560)), 2);
        assert_eq!(calc.reading_time(&words(563)), 3);
    }

    #[test]
    fn test_reading_time_ties_round_to_even() {
        let calc = DerivedMetadataCalculator::new().with_words_per_minute(100);
        let words = |n: usize| vec!["word"; n].join(" ");
        assert_eq!(calc.reading_time(&words(250)), 2);
        assert_eq!(calc.reading_time(&words(350)), 4);
    }

    #[test]
    fn test_reading_time_monotonic() {
        let calc = DerivedMetadataCalculator::new();
        let mut body = String::new();
        let mut previous = calc.reading_time(&body);
        for _ in 0..60 {
            body.push_str("Several more words of prose appended here. ");
            let current = calc.reading_time(&body);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn test_custom_words_per_minute() {
        let calc = DerivedMetadataCalculator::new().with_words_per_minute(100);
        assert_eq!(calc.reading_time(&vec!["w"; 300].join(" ")), 3);
        assert_eq!(DerivedMetadataCalculator::new().with_words_per_minute(0).words_per_minute(), 1);
    }

    #[test]
    fn test_compute_uses_configured_length() {
        let calc = DerivedMetadataCalculator::new().with_excerpt_max_length(20);
        assert_eq!(
            calc.compute(FOX),
            DerivedMetadata {
                reading_time: 1,
                excerpt: "The quick brown...".to_owned(),
            }
        );
    }
}
