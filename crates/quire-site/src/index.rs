//! Index aggregation.

use std::collections::HashMap;

use quire_content::{ContentItem, Kind, Section, normalize};

use crate::blocks::compare_recency;

/// What an index lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexKind {
    /// Everything listed in a section, or the whole site for `/`.
    Section,
    /// Blog posts of one section.
    Blog,
    /// Entries of one series, in series order.
    Series,
}

/// An ordered listing page, before pagination.
#[derive(Clone, Debug, PartialEq)]
pub struct Index<'a> {
    /// URL path with leading and trailing slash.
    pub path: String,
    pub kind: IndexKind,
    pub content: Vec<&'a ContentItem>,
}

impl Index<'_> {
    fn new(path: String, kind: IndexKind) -> Self {
        Self {
            path,
            kind,
            content: Vec::new(),
        }
    }

    fn sort(&mut self) {
        match self.kind {
            IndexKind::Series => self.content.sort_by_key(|c| c.series_order),
            IndexKind::Section | IndexKind::Blog => self
                .content
                .sort_by(|a, b| compare_recency(a.published_at, b.published_at)),
        }
    }
}

/// Aggregate all listed content into indexes.
///
/// Every article, blog post and series entry that is not a draft is listed
/// on its section index and on the root index `/`. Blog posts are also listed
/// on `<section>/blog/`, series entries on `<section>/<series>/`. Series
/// indexes are ordered by series rank, every other index newest first.
///
/// Empty indexes are dropped. The result is sorted by path.
#[must_use]
pub fn build_indexes<'a>(all: &'a [ContentItem], sections: &[Section]) -> Vec<Index<'a>> {
    let mut indexes: HashMap<String, Index<'a>> = HashMap::new();
    indexes.insert("/".to_owned(), Index::new("/".to_owned(), IndexKind::Section));
    for section in sections {
        indexes
            .entry(section.path.clone())
            .or_insert_with(|| Index::new(section.path.clone(), IndexKind::Section));
    }

    for item in all.iter().filter(|c| !c.draft && c.kind.is_listed()) {
        if let Some(index) = indexes.get_mut(&item.section_path) {
            index.content.push(item);
        }
        if item.section_path != "/"
            && let Some(root) = indexes.get_mut("/")
        {
            root.content.push(item);
        }

        let base = item.section_path.trim_end_matches('/');
        match item.kind {
            Kind::Blog => {
                let path = format!("{base}/blog/");
                append(&mut indexes, path, IndexKind::Blog, item);
            }
            Kind::Series => {
                // Series without a usable name get no index of their own.
                let series = normalize(&item.series);
                if !series.is_empty() {
                    let path = format!("{base}/{series}/");
                    append(&mut indexes, path, IndexKind::Series, item);
                }
            }
            _ => {}
        }
    }

    let mut result: Vec<Index<'a>> = indexes
        .into_values()
        .filter(|index| !index.content.is_empty())
        .collect();
    for index in &mut result {
        index.sort();
    }
    result.sort_by(|a, b| a.path.cmp(&b.path));

    tracing::debug!(indexes = result.len(), "Built indexes");
    result
}

fn append<'a>(
    indexes: &mut HashMap<String, Index<'a>>,
    path: String,
    kind: IndexKind,
    item: &'a ContentItem,
) {
    indexes
        .entry(path)
        .or_insert_with_key(|path| Index::new(path.clone(), kind))
        .content
        .push(item);
}
