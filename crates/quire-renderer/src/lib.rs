//! Markdown to HTML rendering for Quire.
//!
//! [`MarkdownRenderer`] walks the `pulldown-cmark` event stream and writes
//! HTML where every block element carries a `prose-*` presentation class.
//! The HTML emitted for each element lives on [`NodeKind`].
//!
//! # Example
//!
//! ```
//! use quire_renderer::MarkdownRenderer;
//!
//! let html = MarkdownRenderer::new().to_html(b"# Hello\n\n**Bold** text").unwrap();
//! assert_eq!(
//!     html,
//!     r#"<h1 class="prose-h1">Hello</h1><p class="prose-p"><strong>Bold</strong> text</p>"#
//! );
//! ```

mod html;
mod renderer;

pub use html::{NodeKind, escape_html};
pub use renderer::{MarkdownRenderer, RenderError, RenderResult};
