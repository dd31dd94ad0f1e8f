//! Index pagination.

use std::path::PathBuf;

use quire_content::ContentItem;

use crate::index::Index;

/// One page of an index.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexPage<'i, 'a> {
    /// 1-based page number.
    pub number: usize,
    pub total: usize,
    /// Public URL of this page.
    pub url: String,
    /// File path relative to the output directory.
    pub output_path: PathBuf,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
    pub content: &'i [&'a ContentItem],
}

/// Split an index into pages of `page_size` items.
///
/// Page 1 lives at the index path itself, page N at `<path>page/N/`.
/// A page size of 0 is treated as 1. An empty index yields no pages.
///
/// ```
/// use quire_content::{ContentItem, Kind, Section};
/// use quire_site::{build_indexes, paginate};
///
/// let root = Section::new("root", "/");
/// let all: Vec<_> = (0..3)
///     .map(|i| ContentItem::new(format!("post {i}"), Kind::Article, &root))
///     .collect();
/// let indexes = build_indexes(&all, &[root]);
///
/// let pages = paginate(&indexes[0], 2);
/// assert_eq!(pages.len(), 2);
/// assert_eq!(pages[1].url, "/page/2/");
/// assert_eq!(pages[1].prev_url.as_deref(), Some("/"));
/// ```
#[must_use]
pub fn paginate<'i, 'a>(index: &'i Index<'a>, page_size: usize) -> Vec<IndexPage<'i, 'a>> {
    let chunks: Vec<&'i [&'a ContentItem]> = index.content.chunks(page_size.max(1)).collect();
    let total = chunks.len();

    chunks
        .into_iter()
        .enumerate()
        .map(|(i, content)| {
            let number = i + 1;
            IndexPage {
                number,
                total,
                url: page_url(&index.path, number),
                output_path: page_output_path(&index.path, number),
                prev_url: (number > 1).then(|| page_url(&index.path, number - 1)),
                next_url: (number < total).then(|| page_url(&index.path, number + 1)),
                content,
            }
        })
        .collect()
}

fn page_url(path: &str, number: usize) -> String {
    if number == 1 {
        path.to_owned()
    } else {
        format!("{path}page/{number}/")
    }
}

fn page_output_path(path: &str, number: usize) -> PathBuf {
    let mut out = PathBuf::from(path.trim_start_matches('/'));
    if number > 1 {
        out.push("page");
        out.push(number.to_string());
    }
    out.push("index.html");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexKind;
    use pretty_assertions::assert_eq;
    use quire_content::{Kind, Section};

    fn items(n: usize) -> Vec<ContentItem> {
        let news = Section::new("news", "/news/");
        (0..n)
            .map(|i| ContentItem::new(format!("post {i}"), Kind::Blog, &news))
            .collect()
    }

    fn index(all: &[ContentItem]) -> Index<'_> {
        Index {
            path: "/news/".to_owned(),
            kind: IndexKind::Section,
            content: all.iter().collect(),
        }
    }

    #[test]
    fn test_paginate_splits_into_pages() {
        let all = items(20);
        let index = index(&all);

        let pages = paginate(&index, 9);

        let sizes: Vec<usize> = pages.iter().map(|p| p.content.len()).collect();
        assert_eq!(sizes, vec![9, 9, 2]);
        assert!(pages.iter().all(|p| p.total == 3));
        assert_eq!(pages[2].content[1].heading, "post 19");
    }

    #[test]
    fn test_paginate_urls_and_paths() {
        let all = items(5);
        let index = index(&all);

        let pages = paginate(&index, 2);

        assert_eq!(pages[0].url, "/news/");
        assert_eq!(pages[0].output_path, PathBuf::from("news/index.html"));
        assert_eq!(pages[0].prev_url, None);
        assert_eq!(pages[0].next_url.as_deref(), Some("/news/page/2/"));

        assert_eq!(pages[1].url, "/news/page/2/");
        assert_eq!(pages[1].output_path, PathBuf::from("news/page/2/index.html"));
        assert_eq!(pages[1].prev_url.as_deref(), Some("/news/"));
        assert_eq!(pages[1].next_url.as_deref(), Some("/news/page/3/"));

        assert_eq!(pages[2].prev_url.as_deref(), Some("/news/page/2/"));
        assert_eq!(pages[2].next_url, None);
    }

    #[test]
    fn test_paginate_root_output_path() {
        let all = items(1);
        let mut index = index(&all);
        index.path = "/".to_owned();

        let pages = paginate(&index, 9);
        assert_eq!(pages[0].output_path, PathBuf::from("index.html"));
    }

    #[test]
    fn test_paginate_zero_page_size() {
        let all = items(3);
        let index = index(&all);
        assert_eq!(paginate(&index, 0).len(), 3);
    }

    #[test]
    fn test_paginate_empty_index() {
        let index = index(&[]);
        assert!(paginate(&index, 9).is_empty());
    }
}
