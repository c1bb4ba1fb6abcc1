//! Event-processing state for the pulldown converter.

use pulldown_cmark::Alignment;

/// Open code block: fence language and collected text.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    open: Option<(Option<String>, String)>,
}

impl CodeBlockState {
    pub fn start(&mut self, language: Option<String>) {
        self.open = Some((language, String::new()));
    }

    /// Close the block, returning its language and raw content.
    pub fn end(&mut self) -> (Option<String>, String) {
        self.open.take().unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        self.open.is_some()
    }

    pub fn push_str(&mut self, text: &str) {
        if let Some((_, buffer)) = &mut self.open {
            buffer.push_str(text);
        }
    }
}

/// Column alignments and position inside the current table.
#[derive(Default)]
pub(crate) struct TableState {
    alignments: Vec<Alignment>,
    column: usize,
    in_head: bool,
}

impl TableState {
    pub fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.column = 0;
    }

    pub fn start_head(&mut self) {
        self.in_head = true;
        self.column = 0;
    }

    pub fn end_head(&mut self) {
        self.in_head = false;
    }

    pub fn start_row(&mut self) {
        self.column = 0;
    }

    pub fn next_cell(&mut self) {
        self.column += 1;
    }

    pub fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// `style` attribute for the current cell, empty for default alignment.
    pub fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.column) {
            Some(Alignment::Left) => r#" style="text-align: left;""#,
            Some(Alignment::Center) => r#" style="text-align: center;""#,
            Some(Alignment::Right) => r#" style="text-align: right;""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Pending image waiting for its alt text.
#[derive(Default)]
pub(crate) struct ImageState {
    /// `(src, title)` of the open image.
    pending: Option<(String, String)>,
    alt_text: String,
}

impl ImageState {
    pub fn start(&mut self, src: String, title: String) {
        self.pending = Some((src, title));
        self.alt_text.clear();
    }

    /// Finish the image, returning `(src, title, alt)`.
    pub fn end(&mut self) -> Option<(String, String, String)> {
        let (src, title) = self.pending.take()?;
        Some((src, title, std::mem::take(&mut self.alt_text)))
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Heading being rendered.
#[derive(Default)]
pub(crate) struct HeadingState {
    level: Option<u8>,
    /// Id from a `{#id}` attribute block.
    explicit_id: Option<String>,
    classes: Vec<String>,
    /// Plain text for the slug and the table of contents.
    text: String,
    /// Inner HTML with inline formatting.
    html: String,
}

/// A heading that has been fully collected.
pub(crate) struct CompletedHeading {
    pub level: u8,
    pub explicit_id: Option<String>,
    pub classes: Vec<String>,
    pub text: String,
    pub html: String,
}

impl HeadingState {
    pub fn start(&mut self, level: u8, explicit_id: Option<String>, classes: Vec<String>) {
        self.level = Some(level);
        self.explicit_id = explicit_id;
        self.classes = classes;
        self.text.clear();
        self.html.clear();
    }

    pub fn is_active(&self) -> bool {
        self.level.is_some()
    }

    pub fn complete(&mut self) -> Option<CompletedHeading> {
        let level = self.level.take()?;
        Some(CompletedHeading {
            level,
            explicit_id: self.explicit_id.take(),
            classes: std::mem::take(&mut self.classes),
            text: std::mem::take(&mut self.text).trim().to_owned(),
            html: std::mem::take(&mut self.html).trim().to_owned(),
        })
    }

    pub fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }
}

/// Convert heading text to an anchor slug.
///
/// Lowercases ASCII alphanumerics, turns runs of whitespace, dashes and
/// underscores into a single dash, and drops everything else.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}
