//! Configuration management for Quire.
//!
//! Parses `quire.toml` with serde and discovers it in the current directory
//! or its parents. CLI arguments override file values through
//! [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.name`, `site.content`, `site.output_dir`
//! - `publish.repo_url`, `publish.branch`, `publish.pages_subdir`, `publish.token`
//! - `publish.commit.name`, `publish.commit.email`, `publish.commit.message`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use quire_publish::PublisherConfig;
use quire_site::BuildConfig;
use quire_vcs::{CommitIdentity, GitAuth};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// Only `Some` values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the content manifest path.
    pub content: Option<PathBuf>,
    /// Override the output directory.
    pub output_dir: Option<PathBuf>,
    /// Override the publish repository URL.
    pub repo_url: Option<String>,
    /// Override the publish branch.
    pub branch: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quire.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site configuration (paths are relative strings from TOML).
    site: SiteConfigRaw,
    /// Publishing configuration.
    pub publish: PublishConfig,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// How a content page shows its heading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStyle {
    /// Heading in a boxed page header.
    #[default]
    Boxed,
    /// Heading overlaid on the page header.
    Overlay,
    /// No page header; the body keeps its own heading.
    Plain,
}

impl HeaderStyle {
    /// Whether the body's leading H1 is dropped because the header shows it.
    #[must_use]
    pub fn strips_leading_h1(self) -> bool {
        matches!(self, Self::Boxed | Self::Overlay)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    name: Option<String>,
    content: Option<String>,
    output_dir: Option<String>,
    blocks_max_items: Option<usize>,
    index_page_size: Option<usize>,
    header_style: Option<HeaderStyle>,
}

/// Resolved site configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Site name shown in page titles.
    pub name: String,
    /// YAML content manifest.
    pub content: PathBuf,
    /// Directory receiving the generated site.
    pub output_dir: PathBuf,
    /// Maximum entries per block list.
    pub blocks_max_items: usize,
    /// Items per index page.
    pub index_page_size: usize,
    pub header_style: HeaderStyle,
}

impl SiteConfig {
    fn with_base(base: &Path) -> Self {
        let defaults = BuildConfig::default();
        Self {
            name: defaults.site_name,
            content: base.join("content.yaml"),
            output_dir: base.join("_site"),
            blocks_max_items: defaults.blocks_max_items,
            index_page_size: defaults.index_page_size,
            header_style: HeaderStyle::default(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
}

/// Credentials used for publishing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    /// Access token embedded in the clone URL.
    Token,
    /// Ambient git credentials (SSH agent, credential helper).
    #[default]
    Agent,
}

/// Publishing configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Remote repository URL.
    pub repo_url: String,
    /// Branch receiving the site.
    pub branch: String,
    /// Directory inside the repository holding the site.
    pub pages_subdir: String,
    pub auth: AuthMethod,
    /// Access token, required when `auth = "token"`.
    pub token: Option<String>,
    /// Deadline for a whole publish or plan run.
    pub timeout_secs: Option<u64>,
    pub commit: CommitConfig,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            repo_url: String::new(),
            branch: "gh-pages".to_owned(),
            pages_subdir: String::new(),
            auth: AuthMethod::default(),
            token: None,
            timeout_secs: None,
            commit: CommitConfig::default(),
        }
    }
}

/// Commit identity and message.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            name: "Quire".to_owned(),
            email: "quire@localhost".to_owned(),
            message: "Publish site".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`publish.token`").
        field: String,
        /// Error message (e.g., "${`GITHUB_TOKEN`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_positive(value: usize, field: &str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation(format!(
            "{field} must be greater than 0"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `quire.toml` in the current directory and its parents, falling
    /// back to defaults relative to the current directory.
    ///
    /// CLI settings are applied after path resolution and take precedence.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing, expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(content) = &settings.content {
            self.site_resolved.content.clone_from(content);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.site_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(repo_url) = &settings.repo_url {
            self.publish.repo_url.clone_from(repo_url);
        }
        if let Some(branch) = &settings.branch {
            self.publish.branch.clone_from(branch);
        }
    }

    /// Settings for the site builder.
    #[must_use]
    pub fn build_config(&self) -> BuildConfig {
        let site = &self.site_resolved;
        BuildConfig {
            blocks_max_items: site.blocks_max_items,
            index_page_size: site.index_page_size,
            strip_leading_h1: site.header_style.strips_leading_h1(),
            site_name: site.name.clone(),
        }
    }

    /// Validated settings for the publisher.
    ///
    /// Publishing needs a repository URL, and a token when `auth = "token"`.
    /// These are only checked here, so commands that never publish work
    /// without them.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a required field is missing.
    pub fn publisher_config(&self) -> Result<PublisherConfig, ConfigError> {
        let publish = &self.publish;
        require_non_empty(&publish.repo_url, "publish.repo_url")?;
        require_non_empty(&publish.branch, "publish.branch")?;

        let auth = match publish.auth {
            AuthMethod::Agent => GitAuth::Agent,
            AuthMethod::Token => match publish.token.as_deref().map(str::trim) {
                Some(token) if !token.is_empty() => GitAuth::Token(token.to_owned()),
                _ => {
                    return Err(ConfigError::Validation(
                        "publish.token is required when publish.auth = \"token\"".to_owned(),
                    ));
                }
            },
        };

        let mut config = PublisherConfig::new(&publish.repo_url, &publish.branch)
            .with_pages_subdir(&publish.pages_subdir)
            .with_auth(auth)
            .with_commit(CommitIdentity {
                name: publish.commit.name.clone(),
                email: publish.commit.email.clone(),
                message: publish.commit.message.clone(),
            });
        if let Some(secs) = publish.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfigRaw::default(),
            publish: PublishConfig::default(),
            site_resolved: SiteConfig::with_base(base),
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand before resolving so variables can hold paths
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file. Publishing credentials
    /// are checked by [`Config::publisher_config`] instead.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site_resolved.name, "site.name")?;
        require_positive(self.site_resolved.blocks_max_items, "site.blocks_max_items")?;
        require_positive(self.site_resolved.index_page_size, "site.index_page_size")?;
        if self.publish.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "publish.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        fn expand_opt(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
            if let Some(v) = value {
                *v = expand::expand_env(v, field)?;
            }
            Ok(())
        }

        expand_opt(&mut self.site.name, "site.name")?;
        expand_opt(&mut self.site.content, "site.content")?;
        expand_opt(&mut self.site.output_dir, "site.output_dir")?;

        let publish = &mut self.publish;
        publish.repo_url = expand::expand_env(&publish.repo_url, "publish.repo_url")?;
        publish.branch = expand::expand_env(&publish.branch, "publish.branch")?;
        publish.pages_subdir = expand::expand_env(&publish.pages_subdir, "publish.pages_subdir")?;
        expand_opt(&mut publish.token, "publish.token")?;

        let commit = &mut publish.commit;
        commit.name = expand::expand_env(&commit.name, "publish.commit.name")?;
        commit.email = expand::expand_env(&commit.email, "publish.commit.email")?;
        commit.message = expand::expand_env(&commit.message, "publish.commit.message")?;

        Ok(())
    }

    /// Resolve relative paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = SiteConfig::with_base(config_dir);
        let resolve = |path: Option<&str>, default: PathBuf| {
            path.map_or(default, |p| config_dir.join(p))
        };

        self.site_resolved = SiteConfig {
            name: self.site.name.clone().unwrap_or(defaults.name),
            content: resolve(self.site.content.as_deref(), defaults.content),
            output_dir: resolve(self.site.output_dir.as_deref(), defaults.output_dir),
            blocks_max_items: self
                .site
                .blocks_max_items
                .unwrap_or(defaults.blocks_max_items),
            index_page_size: self
                .site
                .index_page_size
                .unwrap_or(defaults.index_page_size),
            header_style: self.site.header_style.unwrap_or(defaults.header_style),
        };
    }
}

/// Search for the config file in `start` and its parents.
fn discover_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
