//! Content, section and tag types.
//!
//! These are owned by the persistence side and treated as read-only by the
//! site pipeline. Identity is always the UUID; names and paths may change.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slug::normalize;

/// Content kind.
///
/// Parsed case-insensitively. Kinds the pipeline has no special handling for
/// are preserved in [`Kind::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Kind {
    Article,
    Blog,
    Series,
    Page,
    Other(String),
}

impl Kind {
    /// Lowercase name of the kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Article => "article",
            Self::Blog => "blog",
            Self::Series => "series",
            Self::Page => "page",
            Self::Other(name) => name,
        }
    }

    /// Whether content of this kind is listed on index pages.
    #[must_use]
    pub fn is_listed(&self) -> bool {
        matches!(self, Self::Article | Self::Blog | Self::Series)
    }
}

impl From<&str> for Kind {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "article" => Self::Article,
            "blog" => Self::Blog,
            "series" => Self::Series,
            "page" => Self::Page,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for Kind {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Kind> for String {
    fn from(kind: Kind) -> Self {
        kind.as_str().to_owned()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tag attached to content.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

impl Tag {
    /// Create a tag with a fresh identity.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A site section.
///
/// `path` is the URL prefix of the section, with leading and trailing slash
/// (`"/"` for the root section, `"/news/"` for a nested one).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: Uuid,
    pub name: String,
    pub path: String,
}

impl Section {
    /// Create a section with a fresh identity.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            path: path.into(),
        }
    }

    /// Whether this is the site root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.path == "/"
    }
}

/// A single publishable unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: Uuid,
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub body: String,
    pub section_id: Uuid,
    /// URL prefix of the owning section, denormalised from [`Section::path`].
    #[serde(default)]
    pub section_path: String,
    pub kind: Kind,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Series name; empty when the item is not part of a series.
    #[serde(default)]
    pub series: String,
    #[serde(default)]
    pub series_order: i32,
    #[serde(default)]
    pub draft: bool,
    /// Explicit slug, overriding the one derived from the heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl ContentItem {
    /// Create a published, untagged item in `section`.
    #[must_use]
    pub fn new(heading: impl Into<String>, kind: Kind, section: &Section) -> Self {
        Self {
            id: Uuid::new_v4(),
            heading: heading.into(),
            body: String::new(),
            section_id: section.id,
            section_path: section.path.clone(),
            kind,
            tags: Vec::new(),
            published_at: None,
            series: String::new(),
            series_order: 0,
            draft: false,
            slug: None,
        }
    }

    /// Set the markdown body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Attach tags.
    #[must_use]
    pub fn with_tags(mut self, tags: &[Tag]) -> Self {
        self.tags.extend_from_slice(tags);
        self
    }

    /// Set the publication timestamp.
    #[must_use]
    pub fn published_at(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    /// Place the item in a series at the given position.
    #[must_use]
    pub fn in_series(mut self, series: impl Into<String>, order: i32) -> Self {
        self.series = series.into();
        self.series_order = order;
        self
    }

    /// Set an explicit slug.
    #[must_use]
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Mark the item as a draft.
    #[must_use]
    pub fn as_draft(mut self) -> Self {
        self.draft = true;
        self
    }

    /// Whether the two items have at least one tag identity in common.
    #[must_use]
    pub fn shares_tag(&self, other: &ContentItem) -> bool {
        self.tags
            .iter()
            .any(|tag| other.tags.iter().any(|t| t.id == tag.id))
    }

    /// First eight hex characters of the identity.
    #[must_use]
    pub fn short_id(&self) -> String {
        let mut id = self.id.simple().to_string();
        id.truncate(8);
        id
    }

    /// URL slug: the normalised explicit slug if it has any letters or
    /// digits, else the normalised heading followed by the short id.
    #[must_use]
    pub fn slug(&self) -> String {
        if let Some(explicit) = &self.slug {
            let slug = normalize(explicit);
            if !slug.is_empty() {
                return slug;
            }
        }
        match normalize(&self.heading) {
            heading if heading.is_empty() => self.short_id(),
            heading => format!("{heading}-{}", self.short_id()),
        }
    }
}
