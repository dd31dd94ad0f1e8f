//! Event-driven Markdown renderer.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::html::{self, NodeKind, escape_html};

/// Error returned when Markdown cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Markdown is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Result of rendering Markdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Plain text of the first H1, if any.
    pub title: Option<String>,
}

/// Markdown to HTML renderer.
///
/// Block elements are written back to back without separating newlines.
/// Code is escaped and written verbatim, never re-parsed as Markdown. Raw
/// HTML in the source passes through unchanged.
#[derive(Clone, Debug)]
pub struct MarkdownRenderer {
    strip_leading_h1: bool,
    gfm: bool,
}

impl MarkdownRenderer {
    /// Create a renderer with GitHub Flavored Markdown enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strip_leading_h1: false,
            gfm: true,
        }
    }

    /// Drop an H1 that is the very first block of the document.
    ///
    /// The heading text is still reported in [`RenderResult::title`].
    #[must_use]
    pub fn with_leading_h1_stripped(mut self) -> Self {
        self.strip_leading_h1 = true;
        self
    }

    /// Enable or disable GitHub Flavored Markdown (tables, strikethrough,
    /// task lists).
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Parser options matching the configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
        } else {
            Options::empty()
        }
    }

    /// Render raw Markdown bytes to HTML.
    pub fn to_html(&self, markdown: &[u8]) -> Result<String, RenderError> {
        Ok(self.render_bytes(markdown)?.html)
    }

    /// Render raw Markdown bytes, returning HTML and title.
    pub fn render_bytes(&self, markdown: &[u8]) -> Result<RenderResult, RenderError> {
        let text = std::str::from_utf8(markdown)?;
        Ok(self.render_markdown(text))
    }

    /// Render Markdown text.
    #[must_use]
    pub fn render_markdown(&self, markdown: &str) -> RenderResult {
        self.render(Parser::new_ext(markdown, self.parser_options()))
    }

    /// Render a stream of parser events.
    ///
    /// Any event source works, which allows callers to filter or rewrite
    /// events before they reach the renderer.
    pub fn render<'a, I>(&self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        let mut writer = HtmlWriter::new(self.strip_leading_h1);
        for event in events {
            writer.process_event(event);
        }
        RenderResult {
            html: writer.output,
            title: writer.title,
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Alt text collected for an image being rendered.
struct PendingImage {
    src: String,
    alt: String,
    /// Images nested in the alt text.
    depth: usize,
}

/// Per-render state.
struct HtmlWriter {
    output: String,
    /// Open container elements, innermost last.
    open: Vec<NodeKind>,
    strip_leading_h1: bool,
    /// Whether any block has started yet.
    seen_block: bool,
    /// Output is discarded while a stripped heading is open.
    suppressing: bool,
    in_table_head: bool,
    code: Option<String>,
    image: Option<PendingImage>,
    title: Option<String>,
    /// Text of the first H1 while it is being read.
    title_buffer: Option<String>,
}

impl HtmlWriter {
    fn new(strip_leading_h1: bool) -> Self {
        Self {
            output: String::with_capacity(4096),
            open: Vec::new(),
            strip_leading_h1,
            seen_block: false,
            suppressing: false,
            in_table_head: false,
            code: None,
            image: None,
            title: None,
            title_buffer: None,
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.code_span(&code),
            Event::Html(raw) | Event::InlineHtml(raw) => self.raw_html(&raw),
            Event::SoftBreak => self.text("\n"),
            Event::HardBreak => self.leaf(html::hard_break),
            Event::Rule => {
                self.seen_block = true;
                self.leaf(html::thematic_break);
            }
            Event::TaskListMarker(checked) => {
                self.leaf(|out| html::task_list_marker(checked, out));
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        if let Some(image) = &mut self.image {
            // Markup inside alt text is flattened to its text.
            if matches!(tag, Tag::Image { .. }) {
                image.depth += 1;
            }
            return;
        }

        let node = match tag {
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::Heading { level, .. } => {
                let level = heading_level(level);
                if level == 1 && self.title.is_none() && self.title_buffer.is_none() {
                    self.title_buffer = Some(String::new());
                    if self.strip_leading_h1 && !self.seen_block {
                        self.suppressing = true;
                    }
                }
                NodeKind::Heading(level)
            }
            Tag::BlockQuote(_) => NodeKind::Blockquote,
            Tag::CodeBlock(_) => {
                self.seen_block = true;
                self.code = Some(String::new());
                return;
            }
            Tag::HtmlBlock => {
                self.seen_block = true;
                return;
            }
            Tag::List(start) => NodeKind::List {
                ordered: start.is_some(),
                start: start.unwrap_or(1),
            },
            Tag::Item => NodeKind::ListItem,
            Tag::FootnoteDefinition(_) | Tag::MetadataBlock(_) => return,
            Tag::DefinitionList => NodeKind::DefinitionList,
            Tag::DefinitionListTitle => NodeKind::DefinitionTitle,
            Tag::DefinitionListDefinition => NodeKind::DefinitionDetail,
            Tag::Table(_) => NodeKind::Table,
            Tag::TableHead => {
                self.in_table_head = true;
                NodeKind::TableHead
            }
            Tag::TableRow => NodeKind::TableRow,
            Tag::TableCell => NodeKind::TableCell {
                head: self.in_table_head,
            },
            Tag::Emphasis => NodeKind::Emphasis,
            Tag::Strong => NodeKind::Strong,
            Tag::Strikethrough => NodeKind::Strikethrough,
            Tag::Superscript => NodeKind::Superscript,
            Tag::Subscript => NodeKind::Subscript,
            Tag::Link { dest_url, .. } => NodeKind::Link {
                dest: dest_url.into_string(),
            },
            Tag::Image { dest_url, .. } => {
                self.image = Some(PendingImage {
                    src: dest_url.into_string(),
                    alt: String::new(),
                    depth: 0,
                });
                return;
            }
        };

        if is_block(&node) {
            self.seen_block = true;
        }
        if !self.suppressing {
            node.enter(&mut self.output);
        }
        self.open.push(node);
    }

    fn end_tag(&mut self, tag: TagEnd) {
        if let Some(image) = &mut self.image {
            if tag == TagEnd::Image {
                if image.depth == 0 {
                    self.finish_image();
                } else {
                    image.depth -= 1;
                }
            }
            return;
        }

        match tag {
            TagEnd::CodeBlock => {
                if let Some(content) = self.code.take() {
                    self.leaf(|out| html::code_block(&content, out));
                }
                return;
            }
            TagEnd::HtmlBlock | TagEnd::FootnoteDefinition | TagEnd::MetadataBlock(_) => return,
            TagEnd::TableHead => self.in_table_head = false,
            _ => {}
        }

        let Some(node) = self.open.pop() else {
            return;
        };
        if !self.suppressing {
            node.leave(&mut self.output);
        }
        if matches!(node, NodeKind::Heading(1))
            && let Some(title) = self.title_buffer.take()
        {
            self.title = Some(title.trim().to_owned());
            self.suppressing = false;
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = &mut self.code {
            code.push_str(text);
            return;
        }
        if let Some(image) = &mut self.image {
            image.alt.push_str(text);
            return;
        }
        if let Some(title) = &mut self.title_buffer {
            title.push_str(text);
        }
        if !self.suppressing {
            self.output.push_str(&escape_html(text));
        }
    }

    fn code_span(&mut self, code: &str) {
        if let Some(image) = &mut self.image {
            image.alt.push_str(code);
            return;
        }
        if let Some(title) = &mut self.title_buffer {
            title.push_str(code);
        }
        self.leaf(|out| html::code_span(code, out));
    }

    fn raw_html(&mut self, raw: &str) {
        if self.image.is_none() && !self.suppressing {
            self.output.push_str(raw);
        }
    }

    fn finish_image(&mut self) {
        if let Some(image) = self.image.take() {
            self.leaf(|out| html::image(&image.src, &image.alt, out));
        }
    }

    /// Write a childless element unless output is suppressed.
    fn leaf(&mut self, write: impl FnOnce(&mut String)) {
        if !self.suppressing && self.image.is_none() {
            write(&mut self.output);
        }
    }
}

fn is_block(node: &NodeKind) -> bool {
    matches!(
        node,
        NodeKind::Heading(_)
            | NodeKind::Paragraph
            | NodeKind::List { .. }
            | NodeKind::Blockquote
            | NodeKind::Table
            | NodeKind::DefinitionList
    )
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
