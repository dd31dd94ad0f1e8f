//! HTML emitted per Markdown element.

use std::fmt::Write;

/// A container element of the Markdown tree.
///
/// Each variant writes its opening markup on [`enter`](Self::enter) and the
/// matching close on [`leave`](Self::leave). Leaf elements (code, images,
/// rules) have no children and are written by the free functions in this
/// module instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Heading of level 1 to 6.
    Heading(u8),
    Paragraph,
    /// Ordered or unordered list; `start` is the first number of an ordered list.
    List { ordered: bool, start: u64 },
    ListItem,
    Blockquote,
    Emphasis,
    Strong,
    Strikethrough,
    Superscript,
    Subscript,
    Table,
    TableHead,
    TableRow,
    TableCell { head: bool },
    Link { dest: String },
    DefinitionList,
    DefinitionTitle,
    DefinitionDetail,
}

impl NodeKind {
    /// Write the opening markup.
    pub fn enter(&self, out: &mut String) {
        match self {
            Self::Heading(level) => {
                let _ = write!(out, r#"<h{level} class="prose-h{level}">"#);
            }
            Self::Paragraph => out.push_str(r#"<p class="prose-p">"#),
            Self::List {
                ordered: true,
                start: 1,
            } => out.push_str(r#"<ol class="prose-ul">"#),
            Self::List {
                ordered: true,
                start,
            } => {
                let _ = write!(out, r#"<ol start="{start}" class="prose-ul">"#);
            }
            Self::List { ordered: false, .. } => out.push_str(r#"<ul class="prose-ul">"#),
            Self::ListItem => out.push_str(r#"<li class="prose-li">"#),
            Self::Blockquote => out.push_str(r#"<blockquote class="prose-blockquote">"#),
            Self::Emphasis => out.push_str("<em>"),
            Self::Strong => out.push_str("<strong>"),
            Self::Strikethrough => out.push_str("<del>"),
            Self::Superscript => out.push_str("<sup>"),
            Self::Subscript => out.push_str("<sub>"),
            Self::Table => out.push_str(r#"<table class="prose-table">"#),
            Self::TableHead => out.push_str("<thead><tr>"),
            Self::TableRow => out.push_str("<tr>"),
            Self::TableCell { head: true } => out.push_str("<th>"),
            Self::TableCell { head: false } => out.push_str("<td>"),
            Self::Link { dest } => {
                let _ = write!(out, r#"<a href="{}" class="prose-a">"#, escape_html(dest));
            }
            Self::DefinitionList => out.push_str("<dl>"),
            Self::DefinitionTitle => out.push_str("<dt>"),
            Self::DefinitionDetail => out.push_str("<dd>"),
        }
    }

    /// Write the closing markup.
    pub fn leave(&self, out: &mut String) {
        match self {
            Self::Heading(level) => {
                let _ = write!(out, "</h{level}>");
            }
            Self::Paragraph => out.push_str("</p>"),
            Self::List { ordered: true, .. } => out.push_str("</ol>"),
            Self::List { ordered: false, .. } => out.push_str("</ul>"),
            Self::ListItem => out.push_str("</li>"),
            Self::Blockquote => out.push_str("</blockquote>"),
            Self::Emphasis => out.push_str("</em>"),
            Self::Strong => out.push_str("</strong>"),
            Self::Strikethrough => out.push_str("</del>"),
            Self::Superscript => out.push_str("</sup>"),
            Self::Subscript => out.push_str("</sub>"),
            // Body rows follow the head inside <tbody>.
            Self::Table => out.push_str("</tbody></table>"),
            Self::TableHead => out.push_str("</tr></thead><tbody>"),
            Self::TableRow => out.push_str("</tr>"),
            Self::TableCell { head: true } => out.push_str("</th>"),
            Self::TableCell { head: false } => out.push_str("</td>"),
            Self::Link { .. } => out.push_str("</a>"),
            Self::DefinitionList => out.push_str("</dl>"),
            Self::DefinitionTitle => out.push_str("</dt>"),
            Self::DefinitionDetail => out.push_str("</dd>"),
        }
    }
}

pub(crate) fn code_block(content: &str, out: &mut String) {
    let _ = write!(out, "<pre><code>{}</code></pre>", escape_html(content));
}

pub(crate) fn code_span(content: &str, out: &mut String) {
    let _ = write!(out, "<code>{}</code>", escape_html(content));
}

pub(crate) fn image(src: &str, alt: &str, out: &mut String) {
    let _ = write!(
        out,
        r#"<img src="{}" alt="{}" class="prose-img">"#,
        escape_html(src),
        escape_html(alt)
    );
}

pub(crate) fn thematic_break(out: &mut String) {
    out.push_str(r#"<hr class="prose-hr">"#);
}

pub(crate) fn hard_break(out: &mut String) {
    out.push_str("<br>");
}

pub(crate) fn task_list_marker(checked: bool, out: &mut String) {
    if checked {
        out.push_str(r#"<input type="checkbox" checked disabled> "#);
    } else {
        out.push_str(r#"<input type="checkbox" disabled> "#);
    }
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
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wrap(node: &NodeKind) -> String {
        let mut out = String::new();
        node.enter(&mut out);
        out.push('x');
        node.leave(&mut out);
        out
    }

    #[test]
    fn test_heading_classes() {
        assert_eq!(wrap(&NodeKind::Heading(3)), r#"<h3 class="prose-h3">x</h3>"#);
    }

    #[test]
    fn test_list_markup() {
        assert_eq!(
            wrap(&NodeKind::List {
                ordered: false,
                start: 1
            }),
            r#"<ul class="prose-ul">x</ul>"#
        );
        assert_eq!(
            wrap(&NodeKind::List {
                ordered: true,
                start: 1
            }),
            r#"<ol class="prose-ul">x</ol>"#
        );
        assert_eq!(
            wrap(&NodeKind::List {
                ordered: true,
                start: 4
            }),
            r#"<ol start="4" class="prose-ul">x</ol>"#
        );
    }

    #[test]
    fn test_link_escapes_destination() {
        assert_eq!(
            wrap(&NodeKind::Link {
                dest: "/a?b=1&c=2".to_owned()
            }),
            r#"<a href="/a?b=1&amp;c=2" class="prose-a">x</a>"#
        );
    }

    #[test]
    fn test_image() {
        let mut out = String::new();
        image("cat.png", "A \"cat\"", &mut out);
        assert_eq!(
            out,
            r#"<img src="cat.png" alt="A &quot;cat&quot;" class="prose-img">"#
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
        assert_eq!(escape_html("plain"), "plain");
    }
}
