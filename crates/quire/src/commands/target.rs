//! Arguments shared by `plan` and `publish`.

use std::path::PathBuf;

use clap::Args;
use quire_config::{CliSettings, Config};
use quire_publish::PublisherConfig;

use crate::error::CliError;

/// Where the site comes from and where it goes.
#[derive(Args)]
pub(crate) struct TargetArgs {
    /// Directory containing the built site (default: `site.output_dir`).
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Repository URL (overrides config).
    #[arg(long, env = "QUIRE_REPO_URL")]
    repo_url: Option<String>,

    /// Branch to publish to (overrides config).
    #[arg(long)]
    branch: Option<String>,

    /// Path to configuration file (default: auto-discover quire.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl TargetArgs {
    /// Load the configuration and resolve the publisher settings and site
    /// directory.
    pub(crate) fn resolve(self) -> Result<(PublisherConfig, PathBuf), CliError> {
        let cli_settings = CliSettings {
            output_dir: self.directory,
            repo_url: self.repo_url,
            branch: self.branch,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let publisher_config = config.publisher_config()?;
        Ok((publisher_config, config.site_resolved.output_dir))
    }
}
