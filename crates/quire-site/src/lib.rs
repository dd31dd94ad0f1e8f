//! Block, index and page generation for Quire.
//!
//! This crate turns a full content set into the data and files of a static
//! site:
//!
//! - [`build_blocks`]: related, recent and series navigation lists for one item
//! - [`build_indexes`]: section, blog and series listings for the whole site
//! - [`paginate`]: splits an index into numbered pages
//! - [`SiteBuilder`]: renders everything into a staging directory
//!
//! Block and index building are pure functions over borrowed content; they
//! never mutate or clone the items they are given.
//!
//! # Example
//!
//! ```
//! use quire_content::{ContentItem, Kind, Section};
//! use quire_site::{build_blocks, build_indexes};
//!
//! let root = Section::new("root", "/");
//! let all = vec![
//!     ContentItem::new("One", Kind::Blog, &root),
//!     ContentItem::new("Two", Kind::Blog, &root),
//! ];
//!
//! let blocks = build_blocks(&all[0], &all, 5);
//! assert_eq!(blocks.blog_recent.len(), 1);
//!
//! let indexes = build_indexes(&all, &[root]);
//! assert!(indexes.iter().any(|index| index.path == "/blog/"));
//! ```

mod blocks;
mod builder;
mod index;
mod pagination;
mod template;

pub use blocks::{GeneratedBlocks, build_blocks};
pub use builder::{BuildConfig, BuildError, BuildSummary, SiteBuilder};
pub use index::{Index, IndexKind, build_indexes};
pub use pagination::{IndexPage, paginate};
