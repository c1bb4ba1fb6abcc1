//! Footnote index extraction from rendered HTML.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// `<sup id="fnref:N"><a ... href="#fn:N" ...>M</a></sup>`; ids are compared in code.
static FOOTNOTE_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r##"<sup id="fnref:([^"]+)"><a[^>]*href="#fn:([^"]+)"[^>]*>(\d+)</a></sup>"##)
        .unwrap()
});

/// A footnote reference found in rendered HTML.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FootnoteRef {
    /// Display number parsed from the link text.
    pub number: u32,
    /// Link text as written.
    pub original_number: String,
}

/// Footnote id to reference, ordered by id.
pub type FootnoteIndex = BTreeMap<String, FootnoteRef>;

/// Builds a [`FootnoteIndex`] from finished HTML.
///
/// # Example
///
/// ```
/// use mdx_renderer::FootnoteIndexer;
///
/// let html = r##"<p>Claim<sup id="fnref:1"><a class="footnote-ref" href="#fn:1">1</a></sup></p>"##;
/// let index = FootnoteIndexer::new().index(html);
///
/// assert_eq!(index["1"].number, 1);
/// assert_eq!(index["1"].original_number, "1");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct FootnoteIndexer;

impl FootnoteIndexer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Collect paired footnote references.
    ///
    /// A reference counts only when the `fnref:` id and the `#fn:` link target
    /// agree. HTML without references yields an empty index.
    #[must_use]
    pub fn index(&self, html: &str) -> FootnoteIndex {
        let mut index = FootnoteIndex::new();

        for caps in FOOTNOTE_REF_RE.captures_iter(html) {
            if caps[1] != caps[2] {
                continue;
            }
            let Ok(number) = caps[3].parse::<u32>() else {
                continue;
            };
            index.entry(caps[1].to_owned()).or_insert_with(|| FootnoteRef {
                number,
                original_number: caps[3].to_owned(),
            });
        }

        tracing::debug!(footnotes = index.len(), "Indexed footnote references");
        index
    }
}
