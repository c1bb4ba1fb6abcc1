//! Default converter built on `pulldown-cmark` events.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::abbr::Abbreviations;
use super::state::{CodeBlockState, HeadingState, ImageState, TableState, escape_html, slugify};
use super::toc::TocEntry;
use super::{ConversionContext, Extensions, MarkdownConverter};
use crate::error::ConvertError;

const PERMALINK_TITLE: &str = "Permanent link to this heading";
const BACKLINK_TEXT: &str = "\u{2191}";

/// Markdown converter producing the HTML the refinement passes expect.
///
/// Stateless and shareable across threads; per-document state lives in the
/// [`ConversionContext`] passed to [`convert`](MarkdownConverter::convert).
///
/// # Example
///
/// ```
/// use mdx_renderer::{ConversionContext, MarkdownConverter, PulldownConverter};
///
/// let converter = PulldownConverter::new();
/// let mut context = ConversionContext::new();
/// let html = converter.convert("## Setup\n\nRun it.", &mut context).unwrap();
///
/// assert!(html.starts_with(r#"<h2 id="setup">Setup<a class="heading-permalink""#));
/// assert_eq!(context.toc().len(), 1);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct PulldownConverter {
    extensions: Extensions,
}

impl PulldownConverter {
    /// Create a converter with every extension enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    #[must_use]
    pub fn extensions(&self) -> Extensions {
        self.extensions
    }

    fn options(&self) -> Options {
        let ext = self.extensions;
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, ext.tables);
        options.set(Options::ENABLE_FOOTNOTES, ext.footnotes);
        options.set(Options::ENABLE_DEFINITION_LIST, ext.definition_lists);
        options.set(Options::ENABLE_HEADING_ATTRIBUTES, ext.heading_attributes);
        options.set(Options::ENABLE_STRIKETHROUGH, ext.strikethrough);
        options
    }
}

impl MarkdownConverter for PulldownConverter {
    fn convert(
        &self,
        markdown: &str,
        context: &mut ConversionContext,
    ) -> Result<String, ConvertError> {
        let (source, abbreviations) = if self.extensions.abbreviations {
            Abbreviations::extract(markdown)
        } else {
            (markdown.to_owned(), Abbreviations::default())
        };

        let mut writer = HtmlWriter::new(context, &abbreviations, self.extensions.line_breaks);
        for event in Parser::new_ext(&source, self.options()) {
            writer.process_event(event);
        }
        Ok(writer.finish())
    }
}

/// Single-use HTML writer for one conversion.
struct HtmlWriter<'a> {
    output: String,
    context: &'a mut ConversionContext,
    abbreviations: &'a Abbreviations,
    line_breaks: bool,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    /// Open footnote definitions: label and the output they interrupted.
    footnote_stack: Vec<(String, String)>,
    /// Finished footnote definitions in document order.
    footnotes: Vec<(String, String)>,
}

impl<'a> HtmlWriter<'a> {
    fn new(
        context: &'a mut ConversionContext,
        abbreviations: &'a Abbreviations,
        line_breaks: bool,
    ) -> Self {
        Self {
            output: String::with_capacity(4096),
            context,
            abbreviations,
            line_breaks,
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::default(),
            footnote_stack: Vec::new(),
            footnotes: Vec::new(),
        }
    }

    /// Push content to output or heading buffer based on context.
    fn push_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.push_inline(&html),
            Event::FootnoteReference(label) => self.footnote_reference(&label),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br />\n"),
            Event::Rule => self.output.push_str("<hr />\n"),
            Event::TaskListMarker(checked) => {
                let checked = if checked { r#" checked="""# } else { "" };
                write!(
                    self.output,
                    r#"<input type="checkbox" disabled=""{checked} /> "#
                )
                .unwrap();
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => self.text(&math),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading {
                level,
                id,
                classes,
                ..
            } => {
                self.heading.start(
                    heading_level_to_num(level),
                    id.map(|id| id.to_string()),
                    classes.iter().map(ToString::to_string).collect(),
                );
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>\n"),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => fence_language(&info),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>\n"),
                Some(n) => writeln!(self.output, r#"<ol start="{n}">"#).unwrap(),
                None => self.output.push_str("<ul>\n"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(label) => {
                let outer = std::mem::take(&mut self.output);
                self.footnote_stack.push((label.to_string(), outer));
            }
            Tag::DefinitionList => self.output.push_str("<dl>\n"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>\n");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead>\n<tr>\n");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>\n");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<del>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let title = title_attr(&title);
                let link = format!(r#"<a href="{}"{title}>"#, escape_html(&dest_url));
                self.push_inline(&link);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image.start(dest_url.to_string(), title.to_string());
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>\n"),
            TagEnd::Heading(_) => self.end_heading(),
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>\n"),
            TagEnd::CodeBlock => {
                let (lang, content) = self.code.end();
                match lang {
                    Some(lang) => write!(
                        self.output,
                        r#"<pre><code class="language-{}">"#,
                        escape_html(&lang)
                    )
                    .unwrap(),
                    None => self.output.push_str("<pre><code>"),
                }
                self.output.push_str(&escape_html(&content));
                self.output.push_str("</code></pre>\n");
            }
            TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
            }
            TagEnd::Item => self.output.push_str("</li>\n"),
            TagEnd::FootnoteDefinition => {
                if let Some((label, outer)) = self.footnote_stack.pop() {
                    let body = std::mem::replace(&mut self.output, outer);
                    self.footnotes.push((label, body));
                }
            }
            TagEnd::DefinitionList => self.output.push_str("</dl>\n"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>\n"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>\n"),
            TagEnd::Table => self.output.push_str("</tbody>\n</table>\n"),
            TagEnd::TableHead => {
                self.output.push_str("</tr>\n</thead>\n<tbody>\n");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>\n"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>\n"
                } else {
                    "</td>\n"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</del>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => {
                if let Some((src, title, alt)) = self.image.end() {
                    let img = format!(
                        r#"<img src="{}" alt="{}"{} />"#,
                        escape_html(&src),
                        escape_html(&alt),
                        title_attr(&title)
                    );
                    self.push_inline(&img);
                }
            }
        }
    }

    fn end_heading(&mut self) {
        let Some(heading) = self.heading.complete() else {
            return;
        };
        let base = heading
            .explicit_id
            .unwrap_or_else(|| slugify(&heading.text));
        let id = self.context.unique_heading_id(&base);
        let class = if heading.classes.is_empty() {
            String::new()
        } else {
            format!(r#" class="{}""#, escape_html(&heading.classes.join(" ")))
        };
        let level = heading.level;
        let anchor = escape_html(&id);
        writeln!(
            self.output,
            r##"<h{level} id="{anchor}"{class}>{}<a class="heading-permalink" href="#{anchor}" title="{PERMALINK_TITLE}">&para;</a></h{level}>"##,
            heading.html
        )
        .unwrap();

        self.context.push_toc(TocEntry {
            level,
            title: heading.text,
            id,
        });
    }

    fn text(&mut self, text: &str) {
        // Priority: code > image alt > heading > normal text
        if self.code.is_active() {
            self.code.push_str(text);
            return;
        }

        if self.image.is_active() {
            self.image.push_str(text);
            return;
        }

        let html = self.abbreviations.wrap(text);
        if self.heading.is_active() {
            self.heading.push_text(text);
            self.heading.push_html(&html);
            return;
        }

        self.output.push_str(&html);
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
            return;
        }
        if self.heading.is_active() {
            self.heading.push_text(code);
        }
        let html = format!("<code>{}</code>", escape_html(code));
        self.push_inline(&html);
    }

    fn soft_break(&mut self) {
        if self.code.is_active() {
            self.code.push_str("\n");
        } else if self.image.is_active() {
            self.image.push_str(" ");
        } else if self.heading.is_active() {
            self.heading.push_text(" ");
            self.heading.push_html(" ");
        } else if self.line_breaks {
            self.output.push_str("<br />\n");
        } else {
            self.output.push('\n');
        }
    }

    fn footnote_reference(&mut self, label: &str) {
        let (number, occurrence) = self.context.reference_footnote(label);
        let label = escape_html(label);
        let id = if occurrence == 1 {
            format!("fnref:{label}")
        } else {
            format!("fnref{occurrence}:{label}")
        };
        let sup = format!(
            r##"<sup id="{id}"><a class="footnote-ref" href="#fn:{label}">{number}</a></sup>"##
        );
        self.push_inline(&sup);
    }

    /// Append collected footnote definitions and return the HTML.
    fn finish(mut self) -> String {
        if self.footnotes.is_empty() {
            return self.output;
        }

        let mut footnotes = std::mem::take(&mut self.footnotes);
        // Referenced footnotes by number, unreferenced ones after in document order.
        footnotes.sort_by_key(|(label, _)| {
            self.context.footnote_number(label).unwrap_or(usize::MAX)
        });

        self.output.push_str("<div class=\"footnote\">\n<hr />\n<ol>\n");
        for (label, body) in footnotes {
            let backrefs = self.backrefs(&label);
            let id = escape_html(&label);
            let body = body.trim_end();
            let body = match body.strip_suffix("</p>") {
                Some(inner) if !backrefs.is_empty() => format!("{inner}&#160;{backrefs}</p>"),
                _ if !backrefs.is_empty() => format!("{body}\n<p>{backrefs}</p>"),
                _ => body.to_owned(),
            };
            write!(self.output, "<li id=\"fn:{id}\">\n{body}\n</li>\n").unwrap();
        }
        self.output.push_str("</ol>\n</div>\n");
        self.output
    }

    /// Back-reference links for every reference to footnote `label`.
    fn backrefs(&self, label: &str) -> String {
        let Some(number) = self.context.footnote_number(label) else {
            return String::new();
        };
        let count = self.context.footnote_reference_count(label);
        let label = escape_html(label);
        (1..=count)
            .map(|occurrence| {
                let target = if occurrence == 1 {
                    format!("fnref:{label}")
                } else {
                    format!("fnref{occurrence}:{label}")
                };
                format!(
                    r##"<a class="footnote-backref" href="#{target}" title="Jump back to footnote {number} in the text">{BACKLINK_TEXT}</a>"##
                )
            })
            .collect::<Vec<_>>()
            .join("&#160;")
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Language from a fence info string such as `python title="x"` or `{.rust}`.
fn fence_language(info: &CowStr<'_>) -> Option<String> {
    info.split(|c: char| c.is_whitespace() || c == ',')
        .map(|token| token.trim_matches(|c| c == '{' || c == '}' || c == '.'))
        .find(|token| !token.is_empty())
        .map(str::to_owned)
}

fn title_attr(title: &str) -> String {
    if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(title))
    }
}
