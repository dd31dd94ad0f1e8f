//! Content sources.
//!
//! [`ContentSource`] is the read side of the persistence layer: the site
//! builder only ever asks for every item and every section.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ContentItem, Section};

/// Error returned by content sources.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid content manifest: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Content {content} references unknown section {section}")]
    UnknownSection { content: Uuid, section: Uuid },
}

/// Read access to the full content set.
pub trait ContentSource {
    /// All content items with their tags.
    fn contents(&self) -> Result<Vec<ContentItem>, ContentError>;

    /// All sections.
    fn sections(&self) -> Result<Vec<Section>, ContentError>;
}

/// On-disk manifest layout.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub contents: Vec<ContentItem>,
}

impl Manifest {
    /// Parse a manifest and resolve each item's section path.
    pub fn parse(yaml: &str) -> Result<Self, ContentError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut manifest: Self = serde_yaml::from_str(yaml)?;
        manifest.resolve_section_paths()?;
        Ok(manifest)
    }

    fn resolve_section_paths(&mut self) -> Result<(), ContentError> {
        let paths: HashMap<Uuid, &str> = self
            .sections
            .iter()
            .map(|s| (s.id, s.path.as_str()))
            .collect();

        for item in &mut self.contents {
            let path = paths
                .get(&item.section_id)
                .ok_or(ContentError::UnknownSection {
                    content: item.id,
                    section: item.section_id,
                })?;
            item.section_path = (*path).to_owned();
        }
        Ok(())
    }
}

/// Content source backed by a YAML manifest file.
///
/// The file is read on every call so edits are picked up between builds.
///
/// ```yaml
/// sections:
///   - id: 9f1c6f0e-58d5-4f5e-9a53-0a3a3f4e2b10
///     name: root
///     path: /
/// contents:
///   - id: 2d5b8a44-7c1e-4c0b-8f0e-1d9c2b7a6e31
///     heading: Hello
///     kind: article
///     section_id: 9f1c6f0e-58d5-4f5e-9a53-0a3a3f4e2b10
///     published_at: 2024-05-01T10:00:00Z
///     body: "# Hello"
/// ```
#[derive(Debug, Clone)]
pub struct YamlSource {
    path: PathBuf,
}

impl YamlSource {
    /// Create a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Manifest file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Manifest, ContentError> {
        let yaml = std::fs::read_to_string(&self.path).map_err(|source| ContentError::Io {
            path: self.path.clone(),
            source,
        })?;
        let manifest = Manifest::parse(&yaml)?;
        tracing::debug!(
            path = %self.path.display(),
            sections = manifest.sections.len(),
            contents = manifest.contents.len(),
            "Loaded content manifest"
        );
        Ok(manifest)
    }
}

impl ContentSource for YamlSource {
    fn contents(&self) -> Result<Vec<ContentItem>, ContentError> {
        Ok(self.load()?.contents)
    }

    fn sections(&self) -> Result<Vec<Section>, ContentError> {
        Ok(self.load()?.sections)
    }
}
