//! `quire build` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use quire_config::{CliSettings, Config};
use quire_content::YamlSource;
use quire_site::SiteBuilder;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Content manifest (overrides config).
    #[arg(long)]
    content: Option<PathBuf>,

    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover quire.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            content: self.content,
            output_dir: self.output_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let site = &config.site_resolved;

        output.info(&format!("Content: {}", site.content.display()));
        output.info(&format!("Output: {}", site.output_dir.display()));

        let source = Arc::new(YamlSource::new(site.content.clone()));
        let summary = SiteBuilder::new(source, config.build_config()).build(&site.output_dir)?;

        if summary.skipped > 0 {
            output.warning(&format!("Skipped {} items", summary.skipped));
        }
        output.success(&format!(
            "Built {} pages and {} index pages to {}",
            summary.pages,
            summary.index_pages,
            site.output_dir.display()
        ));
        Ok(())
    }
}
