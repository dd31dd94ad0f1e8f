//! HTML page templates.
//!
//! Pages are assembled by hand; the markup carries the same `prose-*` class
//! vocabulary as the rendered Markdown.

use std::fmt::Write;

use quire_content::{ContentItem, Section};
use quire_renderer::escape_html;

use crate::blocks::GeneratedBlocks;
use crate::pagination::IndexPage;

/// Public URL of a content page.
pub(crate) fn content_url(item: &ContentItem) -> String {
    format!("{}{}/", item.section_path, item.slug())
}

/// Shared page chrome.
pub(crate) struct Layout<'a> {
    pub site_name: &'a str,
    pub menu: &'a [Section],
}

/// Data for a single content page.
pub(crate) struct ContentPage<'a, 'b> {
    pub item: &'a ContentItem,
    /// Page header title. Empty when the body keeps its own heading.
    pub header: &'a str,
    pub html: &'a str,
    pub blocks: &'a GeneratedBlocks<'b>,
}

pub(crate) fn render_content_page(layout: &Layout<'_>, page: &ContentPage<'_, '_>) -> String {
    let mut html = String::with_capacity(4096 + page.html.len());
    let title = if page.header.is_empty() {
        page.item.heading.as_str()
    } else {
        page.header
    };

    open_document(&mut html, layout, title);

    let _ = writeln!(
        html,
        "<article class=\"content content-{}\">",
        escape_html(page.item.kind.as_str())
    );
    if !page.header.is_empty() {
        let _ = writeln!(
            html,
            "<header class=\"content-header\"><h1>{}</h1></header>",
            escape_html(page.header)
        );
    }
    if let Some(at) = page.item.published_at {
        let _ = writeln!(
            html,
            "<time datetime=\"{}\">{}</time>",
            at.to_rfc3339(),
            at.format("%Y-%m-%d")
        );
    }
    html.push_str("<div class=\"prose\">");
    html.push_str(page.html);
    html.push_str("</div>\n</article>\n");

    render_blocks(&mut html, page.blocks);
    close_document(&mut html);
    html
}

pub(crate) fn render_index_page(layout: &Layout<'_>, title: &str, page: &IndexPage<'_, '_>) -> String {
    let mut html = String::with_capacity(4096);
    open_document(&mut html, layout, title);

    html.push_str("<section class=\"index\">\n");
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(title));
    html.push_str("<ul class=\"index-list\">\n");
    for item in page.content {
        render_item_link(&mut html, item);
    }
    html.push_str("</ul>\n");

    if page.total > 1 {
        html.push_str("<nav class=\"pagination\">\n");
        if let Some(prev) = &page.prev_url {
            let _ = writeln!(html, "<a href=\"{}\" rel=\"prev\">Previous</a>", escape_html(prev));
        }
        let _ = writeln!(html, "<span>Page {} of {}</span>", page.number, page.total);
        if let Some(next) = &page.next_url {
            let _ = writeln!(html, "<a href=\"{}\" rel=\"next\">Next</a>", escape_html(next));
        }
        html.push_str("</nav>\n");
    }

    html.push_str("</section>\n");
    close_document(&mut html);
    html
}

fn open_document(html: &mut String, layout: &Layout<'_>, title: &str) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(
        html,
        "<title>{} | {}</title>",
        escape_html(title),
        escape_html(layout.site_name)
    );
    html.push_str("</head>\n<body>\n");

    html.push_str("<header class=\"site-header\">\n");
    let _ = writeln!(html, "<a href=\"/\" class=\"site-name\">{}</a>", escape_html(layout.site_name));
    if !layout.menu.is_empty() {
        html.push_str("<nav class=\"site-menu\"><ul>\n");
        for section in layout.menu {
            let _ = writeln!(
                html,
                "<li><a href=\"{}\">{}</a></li>",
                escape_html(&section.path),
                escape_html(&section.name)
            );
        }
        html.push_str("</ul></nav>\n");
    }
    html.push_str("</header>\n<main>\n");
}

fn close_document(html: &mut String) {
    html.push_str("</main>\n</body>\n</html>\n");
}

fn render_blocks(html: &mut String, blocks: &GeneratedBlocks<'_>) {
    if blocks.is_empty() {
        return;
    }
    html.push_str("<aside class=\"blocks\">\n");

    if blocks.series_prev.is_some() || blocks.series_next.is_some() {
        html.push_str("<nav class=\"series-nav\">\n");
        if let Some(prev) = blocks.series_prev {
            let _ = writeln!(
                html,
                "<a href=\"{}\" rel=\"prev\">{}</a>",
                escape_html(&content_url(prev)),
                escape_html(&prev.heading)
            );
        }
        if let Some(next) = blocks.series_next {
            let _ = writeln!(
                html,
                "<a href=\"{}\" rel=\"next\">{}</a>",
                escape_html(&content_url(next)),
                escape_html(&next.heading)
            );
        }
        html.push_str("</nav>\n");
    }

    render_list(html, "Earlier in this series", &blocks.series_index_backward);
    render_list(html, "Next in this series", &blocks.series_index_forward);
    render_list(html, "Related", &blocks.article_tag_related_same_section);
    render_list(html, "More in this section", &blocks.article_recent_same_section);
    render_list(html, "Related elsewhere", &blocks.article_tag_related_all_sections);
    render_list(html, "Recent articles", &blocks.article_recent_all_sections);
    render_list(html, "Related posts", &blocks.blog_tag_related);
    render_list(html, "Recent posts", &blocks.blog_recent);

    html.push_str("</aside>\n");
}

fn render_list(html: &mut String, title: &str, items: &[&ContentItem]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(html, "<section class=\"block\">\n<h2>{title}</h2>\n<ul>");
    for item in items {
        render_item_link(html, item);
    }
    html.push_str("</ul>\n</section>\n");
}

fn render_item_link(html: &mut String, item: &ContentItem) {
    let _ = writeln!(
        html,
        "<li><a href=\"{}\">{}</a></li>",
        escape_html(&content_url(item)),
        escape_html(&item.heading)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_content::Kind;

    fn layout(menu: &[Section]) -> Layout<'_> {
        Layout {
            site_name: "Acme",
            menu,
        }
    }

    #[test]
    fn test_content_url() {
        let news = Section::new("news", "/news/");
        let item = ContentItem::new("Hello", Kind::Article, &news).with_slug("hello");
        assert_eq!(content_url(&item), "/news/hello/");
    }

    #[test]
    fn test_content_page_escapes_title_and_lists_blocks() {
        let root = Section::new("root", "/");
        let menu = [Section::new("news", "/news/")];
        let item = ContentItem::new("Fish & Chips", Kind::Blog, &root);
        let other = ContentItem::new("Older", Kind::Blog, &root).with_slug("older");
        let blocks = GeneratedBlocks {
            blog_recent: vec![&other],
            ..GeneratedBlocks::default()
        };

        let html = render_content_page(
            &layout(&menu),
            &ContentPage {
                item: &item,
                header: "",
                html: "<p class=\"prose-p\">Body</p>",
                blocks: &blocks,
            },
        );

        assert!(html.contains("<title>Fish &amp; Chips | Acme</title>"));
        assert!(html.contains("<p class=\"prose-p\">Body</p>"));
        assert!(html.contains("<h2>Recent posts</h2>"));
        assert!(html.contains("<a href=\"/older/\">Older</a>"));
        assert!(html.contains("<a href=\"/news/\">news</a>"));
        assert!(!html.contains("content-header"));
    }

    #[test]
    fn test_content_page_header() {
        let root = Section::new("root", "/");
        let item = ContentItem::new("Hello", Kind::Article, &root);
        let blocks = GeneratedBlocks::default();

        let html = render_content_page(
            &layout(&[]),
            &ContentPage {
                item: &item,
                header: "Shown Title",
                html: "",
                blocks: &blocks,
            },
        );

        assert!(html.contains("<header class=\"content-header\"><h1>Shown Title</h1></header>"));
        assert!(!html.contains("class=\"blocks\""));
        assert!(!html.contains("site-menu"));
    }
}
