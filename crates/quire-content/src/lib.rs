//! Content model and content sources for Quire.
//!
//! This crate holds the read-only data the site pipeline works on:
//!
//! - [`ContentItem`]: a publishable unit (article, blog post, series entry, page)
//! - [`Section`]: a URL prefix that groups content into an index hierarchy
//! - [`Tag`]: a label shared between content items, compared by identity
//!
//! Content is obtained through the [`ContentSource`] trait. [`YamlSource`]
//! reads a manifest file; other backends (a relational store, an API) only
//! need to implement the two read methods.

mod model;
mod slug;
mod source;

pub use model::{ContentItem, Kind, Section, Tag};
pub use slug::normalize;
pub use source::{ContentError, ContentSource, Manifest, YamlSource};
