//! `quire plan` command implementation.

use std::sync::Arc;

use clap::Args;
use quire_publish::{PlanReport, Publisher};
use quire_vcs::CliGitClient;

use super::target::TargetArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the plan command.
#[derive(Args)]
pub(crate) struct PlanArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Print the report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

impl PlanArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (config, directory) = self.target.resolve()?;

        let publisher = Publisher::new(Arc::new(CliGitClient::new()));
        let rt = tokio::runtime::Runtime::new()?;
        let report = rt.block_on(publisher.plan(&config, &directory))?;

        if self.json {
            output.data(&serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        if report.is_empty() {
            output.success("No changes");
            return Ok(());
        }
        for line in change_lines(&report) {
            output.data(&line);
        }
        output.highlight(&report.summary);
        Ok(())
    }
}

/// One `<marker> <path>` line per change: `+` added, `~` modified,
/// `-` removed.
fn change_lines(report: &PlanReport) -> Vec<String> {
    let added = report.added.iter().map(|p| format!("+ {p}"));
    let modified = report.modified.iter().map(|p| format!("~ {p}"));
    let removed = report.removed.iter().map(|p| format!("- {p}"));
    added.chain(modified).chain(removed).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quire_publish::parse_status;

    #[test]
    fn test_change_lines() {
        let report = parse_status("D  old.html\nA  new.html\nM  index.html\n");
        assert_eq!(
            change_lines(&report),
            vec!["+ new.html", "~ index.html", "- old.html"]
        );
    }

    #[test]
    fn test_change_lines_empty() {
        assert!(change_lines(&parse_status("")).is_empty());
    }
}
