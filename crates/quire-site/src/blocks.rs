//! Per-content block computation.
//!
//! A block is a list of related or navigationally adjacent items shown next
//! to a page. Which blocks are filled depends on the kind of the current item:
//!
//! - **article**: four disjoint lists, in priority order: tag-related in the
//!   same section, the rest of the section, tag-related elsewhere, the rest of
//!   the site. An item lands in the first list it qualifies for.
//! - **blog**: tag-related and recent posts of the same section.
//! - **series**: previous/next entry plus the remaining entries in both
//!   directions.
//!
//! Every list is ordered newest first. Items without a publication date sort
//! after all dated items and keep their input order among themselves.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use quire_content::{ContentItem, Kind};
use uuid::Uuid;

/// Blocks computed for a single content item.
///
/// Lists borrow from the content set passed to [`build_blocks`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneratedBlocks<'a> {
    pub article_tag_related_same_section: Vec<&'a ContentItem>,
    pub article_recent_same_section: Vec<&'a ContentItem>,
    pub article_tag_related_all_sections: Vec<&'a ContentItem>,
    pub article_recent_all_sections: Vec<&'a ContentItem>,

    pub blog_tag_related: Vec<&'a ContentItem>,
    pub blog_recent: Vec<&'a ContentItem>,

    pub series_prev: Option<&'a ContentItem>,
    pub series_next: Option<&'a ContentItem>,
    /// Entries after the current one, in series order.
    pub series_index_forward: Vec<&'a ContentItem>,
    /// Entries before the current one, closest first.
    pub series_index_backward: Vec<&'a ContentItem>,
}

impl GeneratedBlocks<'_> {
    /// Whether no block has any content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.article_tag_related_same_section.is_empty()
            && self.article_recent_same_section.is_empty()
            && self.article_tag_related_all_sections.is_empty()
            && self.article_recent_all_sections.is_empty()
            && self.blog_tag_related.is_empty()
            && self.blog_recent.is_empty()
            && self.series_prev.is_none()
            && self.series_next.is_none()
            && self.series_index_forward.is_empty()
            && self.series_index_backward.is_empty()
    }
}

/// Compute the blocks for `current` from the full content set.
///
/// Drafts and `current` itself never appear in any block. Each list is capped
/// at `max_items` entries after ordering; previous/next links are not capped.
/// Kinds other than article, blog and series get empty blocks.
#[must_use]
pub fn build_blocks<'a>(
    current: &ContentItem,
    all: &'a [ContentItem],
    max_items: usize,
) -> GeneratedBlocks<'a> {
    let mut blocks = GeneratedBlocks::default();

    match current.kind {
        Kind::Article => build_article_blocks(&mut blocks, current, all, max_items),
        Kind::Blog => build_blog_blocks(&mut blocks, current, all, max_items),
        Kind::Series => build_series_blocks(&mut blocks, current, all, max_items),
        Kind::Page | Kind::Other(_) => {}
    }

    blocks
}

fn build_article_blocks<'a>(
    blocks: &mut GeneratedBlocks<'a>,
    current: &ContentItem,
    all: &'a [ContentItem],
    max_items: usize,
) {
    let candidates = candidates(current, all, &Kind::Article);
    let mut placed = HashSet::new();
    let same_section = |c: &ContentItem| c.section_id == current.section_id;

    blocks.article_tag_related_same_section = take_unplaced(&candidates, &mut placed, |c| {
        same_section(c) && current.shares_tag(c)
    });
    blocks.article_recent_same_section = take_unplaced(&candidates, &mut placed, same_section);
    blocks.article_tag_related_all_sections = take_unplaced(&candidates, &mut placed, |c| {
        !same_section(c) && current.shares_tag(c)
    });
    blocks.article_recent_all_sections =
        take_unplaced(&candidates, &mut placed, |c| !same_section(c));

    for list in [
        &mut blocks.article_tag_related_same_section,
        &mut blocks.article_recent_same_section,
        &mut blocks.article_tag_related_all_sections,
        &mut blocks.article_recent_all_sections,
    ] {
        sort_recent_first(list);
        list.truncate(max_items);
    }
}

fn build_blog_blocks<'a>(
    blocks: &mut GeneratedBlocks<'a>,
    current: &ContentItem,
    all: &'a [ContentItem],
    max_items: usize,
) {
    let mut recent: Vec<&ContentItem> = candidates(current, all, &Kind::Blog)
        .into_iter()
        .filter(|c| c.section_id == current.section_id)
        .collect();
    let mut tag_related: Vec<&ContentItem> = recent
        .iter()
        .copied()
        .filter(|c| current.shares_tag(c))
        .collect();

    for list in [&mut tag_related, &mut recent] {
        sort_recent_first(list);
        list.truncate(max_items);
    }

    blocks.blog_tag_related = tag_related;
    blocks.blog_recent = recent;
}

fn build_series_blocks<'a>(
    blocks: &mut GeneratedBlocks<'a>,
    current: &ContentItem,
    all: &'a [ContentItem],
    max_items: usize,
) {
    if current.series.is_empty() {
        return;
    }

    // Positions into `all`, ordered by series rank; ties keep input order.
    let mut order: Vec<usize> = (0..all.len())
        .filter(|&i| !all[i].draft && all[i].series == current.series)
        .collect();
    order.sort_by_key(|&i| all[i].series_order);

    let Some(pos) = order.iter().position(|&i| all[i].id == current.id) else {
        return;
    };

    blocks.series_prev = pos.checked_sub(1).map(|p| &all[order[p]]);
    blocks.series_next = order.get(pos + 1).map(|&i| &all[i]);
    blocks.series_index_forward = order[pos + 1..]
        .iter()
        .take(max_items)
        .map(|&i| &all[i])
        .collect();
    blocks.series_index_backward = order[..pos]
        .iter()
        .rev()
        .take(max_items)
        .map(|&i| &all[i])
        .collect();
}

/// Published items of `kind`, excluding `current`.
fn candidates<'a>(
    current: &ContentItem,
    all: &'a [ContentItem],
    kind: &Kind,
) -> Vec<&'a ContentItem> {
    all.iter()
        .filter(|c| !c.draft && c.id != current.id && &c.kind == kind)
        .collect()
}

/// Select candidates matching `pred` that no earlier list has claimed.
fn take_unplaced<'a>(
    candidates: &[&'a ContentItem],
    placed: &mut HashSet<Uuid>,
    pred: impl Fn(&ContentItem) -> bool,
) -> Vec<&'a ContentItem> {
    candidates
        .iter()
        .copied()
        .filter(|c| pred(c) && placed.insert(c.id))
        .collect()
}

/// Stable newest-first ordering; undated items go last.
fn sort_recent_first(items: &mut [&ContentItem]) {
    items.sort_by(|a, b| compare_recency(a.published_at, b.published_at));
}

/// Newest-first comparison with undated values after every dated one.
pub(crate) fn compare_recency(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
