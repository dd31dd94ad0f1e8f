//! `quire publish` command implementation.

use std::sync::Arc;

use clap::Args;
use quire_publish::{PublishError, Publisher};
use quire_vcs::CliGitClient;

use super::target::TargetArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Commit message (overrides config).
    #[arg(short, long)]
    message: Option<String>,
}

impl PublishArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (config, directory) = self.target.resolve()?;

        output.info(&format!(
            "Publishing {} to {} ({})",
            directory.display(),
            config.repo_url,
            config.branch
        ));

        let publisher = Publisher::new(Arc::new(CliGitClient::new()));
        let rt = tokio::runtime::Runtime::new()?;
        match rt.block_on(publisher.publish(&config, &directory, self.message.as_deref())) {
            Ok(url) => {
                output.success("Published");
                output.data(&url);
                Ok(())
            }
            Err(PublishError::NoChanges { branch }) => {
                output.warning(&format!("Nothing to publish, {branch} is up to date"));
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
