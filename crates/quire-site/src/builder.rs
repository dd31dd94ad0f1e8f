//! Static site builder.
//!
//! Writes every published content page and every paginated index page into
//! an output directory, ready to be handed to the publisher.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use quire_content::{ContentError, ContentItem, ContentSource, Kind, Section};
use quire_renderer::MarkdownRenderer;

use crate::blocks::build_blocks;
use crate::index::{Index, IndexKind, build_indexes};
use crate::pagination::paginate;
use crate::template::{ContentPage, Layout, render_content_page, render_index_page};

/// Slug that turns a page into the manual index of its section.
const INDEX_SLUG: &str = "index";

/// Error returned by [`SiteBuilder::build`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("I/O error writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Refusing to write outside the output directory: {}", path.display())]
    UnsafePath { path: PathBuf },
    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Site builder settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildConfig {
    /// Maximum entries per block list.
    pub blocks_max_items: usize,
    /// Items per index page.
    pub index_page_size: usize,
    /// Drop a leading H1 from bodies and show the heading in the page header.
    pub strip_leading_h1: bool,
    pub site_name: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            blocks_max_items: 5,
            index_page_size: 9,
            strip_leading_h1: false,
            site_name: "Quire".to_owned(),
        }
    }
}

/// Counts reported after a build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Content pages written.
    pub pages: usize,
    /// Index pages written, counting every paginated page.
    pub index_pages: usize,
    /// Drafts and items that failed to render.
    pub skipped: usize,
}

/// Renders a content source into a directory of HTML files.
pub struct SiteBuilder {
    source: Arc<dyn ContentSource>,
    config: BuildConfig,
}

impl SiteBuilder {
    /// Create a builder over `source`.
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>, config: BuildConfig) -> Self {
        Self { source, config }
    }

    /// Builder settings.
    #[must_use]
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build the site into `output_dir`.
    ///
    /// Content pages go to `<section>/<slug>/index.html`. A page with the slug
    /// `index` becomes `<section>/index.html` and replaces the generated index
    /// for that section. When a generated index page would land on the path
    /// of a content page, the content page is kept and the index page is
    /// skipped. Existing files in `output_dir` are overwritten but not removed.
    pub fn build(&self, output_dir: &Path) -> Result<BuildSummary, BuildError> {
        let contents = self.source.contents()?;
        let sections = self.source.sections()?;

        let menu: Vec<Section> = sections.iter().filter(|s| !s.is_root()).cloned().collect();
        let layout = Layout {
            site_name: &self.config.site_name,
            menu: &menu,
        };

        let mut summary = BuildSummary::default();
        let mut manual_indexes = HashSet::new();
        let mut content_paths = HashSet::new();

        for item in &contents {
            if item.draft {
                tracing::debug!(id = %item.id, heading = %item.heading, "Skipping draft");
                summary.skipped += 1;
                continue;
            }

            let Some(html) = self.render_item(&layout, item, &contents) else {
                summary.skipped += 1;
                continue;
            };

            let slug = item.slug();
            let mut relative = section_dir(&item.section_path);
            if item.kind == Kind::Page && slug == INDEX_SLUG {
                manual_indexes.insert(item.section_path.clone());
            } else {
                relative.push(&slug);
            }
            relative.push("index.html");

            write_page(output_dir, &relative, &html)?;
            content_paths.insert(relative);
            summary.pages += 1;
        }

        for index in build_indexes(&contents, &sections) {
            if manual_indexes.contains(&index.path) {
                tracing::debug!(path = %index.path, "Index replaced by manual page");
                continue;
            }
            let title = index_title(&index, &sections, &self.config.site_name);
            for page in paginate(&index, self.config.index_page_size) {
                if content_paths.contains(&page.output_path) {
                    tracing::warn!(
                        path = %page.output_path.display(),
                        index = %index.path,
                        "Index page collides with a content page, skipping"
                    );
                    continue;
                }
                let html = render_index_page(&layout, &title, &page);
                write_page(output_dir, &page.output_path, &html)?;
                summary.index_pages += 1;
            }
        }

        tracing::info!(
            output = %output_dir.display(),
            pages = summary.pages,
            index_pages = summary.index_pages,
            skipped = summary.skipped,
            "Site built"
        );
        Ok(summary)
    }

    /// Render one content page; `None` when the body fails to render.
    fn render_item(
        &self,
        layout: &Layout<'_>,
        item: &ContentItem,
        all: &[ContentItem],
    ) -> Option<String> {
        let mut renderer = MarkdownRenderer::new();
        if self.config.strip_leading_h1 {
            renderer = renderer.with_leading_h1_stripped();
        }

        let rendered = match renderer.render_bytes(item.body.as_bytes()) {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::warn!(id = %item.id, error = %e, "Failed to render content, skipping");
                return None;
            }
        };

        let header = match (self.config.strip_leading_h1, item.heading.is_empty()) {
            (false, _) => String::new(),
            (true, true) => rendered.title.unwrap_or_default(),
            (true, false) => item.heading.clone(),
        };

        let blocks = build_blocks(item, all, self.config.blocks_max_items);
        Some(render_content_page(
            layout,
            &ContentPage {
                item,
                header: &header,
                html: &rendered.html,
                blocks: &blocks,
            },
        ))
    }
}

fn section_dir(section_path: &str) -> PathBuf {
    PathBuf::from(section_path.trim_start_matches('/'))
}

fn index_title(index: &Index<'_>, sections: &[Section], site_name: &str) -> String {
    match index.kind {
        IndexKind::Section if index.path == "/" => site_name.to_owned(),
        IndexKind::Section => sections
            .iter()
            .find(|s| s.path == index.path)
            .map_or_else(|| index.path.clone(), |s| s.name.clone()),
        IndexKind::Blog => "Blog".to_owned(),
        IndexKind::Series => index
            .content
            .first()
            .map_or_else(|| index.path.clone(), |c| c.series.clone()),
    }
}

fn write_page(output_dir: &Path, relative: &Path, html: &str) -> Result<(), BuildError> {
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(BuildError::UnsafePath {
            path: relative.to_path_buf(),
        });
    }
    let path = output_dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| BuildError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(&path, html).map_err(|source| BuildError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Wrote page");
    Ok(())
}
