//! Abbreviation definitions (`*[HTML]: Hyper Text Markup Language`).

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::state::escape_html;

static DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}\*\[([^\]]+)\]:[ \t]*(.*?)\s*$").unwrap());

/// Abbreviations collected from one document.
#[derive(Debug, Default)]
pub(crate) struct Abbreviations {
    titles: HashMap<String, String>,
    pattern: Option<Regex>,
}

impl Abbreviations {
    /// Remove definition lines from `markdown` and collect them.
    ///
    /// Lines inside fenced code blocks are left alone.
    pub fn extract(markdown: &str) -> (String, Self) {
        let mut titles = HashMap::new();
        let mut body = String::with_capacity(markdown.len());
        let mut fence: Option<&str> = None;

        for line in markdown.split_inclusive('\n') {
            let trimmed = line.trim_start();
            let marker = if trimmed.starts_with("```") {
                Some("```")
            } else if trimmed.starts_with("~~~") {
                Some("~~~")
            } else {
                None
            };
            match (fence, marker) {
                (None, Some(m)) => fence = Some(m),
                (Some(open), Some(m)) if open == m => fence = None,
                _ => {}
            }

            if fence.is_none()
                && marker.is_none()
                && let Some(caps) = DEFINITION.captures(line.trim_end_matches(['\n', '\r']))
            {
                titles.insert(caps[1].trim().to_owned(), caps[2].to_owned());
                continue;
            }
            body.push_str(line);
        }

        let pattern = Self::build_pattern(&titles);
        (body, Self { titles, pattern })
    }

    fn build_pattern(titles: &HashMap<String, String>) -> Option<Regex> {
        if titles.is_empty() {
            return None;
        }
        let mut keys: Vec<&str> = titles.keys().map(String::as_str).collect();
        // Longest first so overlapping abbreviations prefer the full match.
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        let alternation = keys
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"\b(?:{alternation})\b")).ok()
    }

    /// Escape `text` and wrap known abbreviations in `<abbr>`.
    pub fn wrap(&self, text: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return escape_html(text);
        };

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for m in pattern.find_iter(text) {
            out.push_str(&escape_html(&text[last..m.start()]));
            let title = self.titles.get(m.as_str()).map_or("", String::as_str);
            out.push_str(&format!(
                r#"<abbr title="{}">{}</abbr>"#,
                escape_html(title),
                escape_html(m.as_str())
            ));
            last = m.end();
        }
        out.push_str(&escape_html(&text[last..]));
        out
    }
}
