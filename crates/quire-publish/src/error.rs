//! Publisher errors.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use quire_vcs::GitError;

/// Step of a publish or plan run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Workspace,
    Clone,
    Checkout,
    Clean,
    Copy,
    Add,
    Commit,
    Push,
    Status,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Workspace => "create workspace",
            Self::Clone => "clone repository",
            Self::Checkout => "checkout branch",
            Self::Clean => "clean target directory",
            Self::Copy => "copy site",
            Self::Add => "stage changes",
            Self::Commit => "commit changes",
            Self::Push => "push changes",
            Self::Status => "read status",
        })
    }
}

/// Error returned by the publisher.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Invalid publisher configuration: {0}")]
    Validation(String),
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Cannot {stage}: {source}")]
    Git {
        stage: Stage,
        #[source]
        source: GitError,
    },
    #[error("Cannot {stage}: {source}")]
    Io {
        stage: Stage,
        #[source]
        source: std::io::Error,
    },
    #[error("Publishing timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
    /// The site already matches the remote branch; nothing was committed.
    #[error("Nothing to publish: branch {branch} already matches the site")]
    NoChanges { branch: String },
}

impl PublishError {
    /// The step that failed, for git and I/O failures.
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Git { stage, .. } | Self::Io { stage, .. } => Some(*stage),
            Self::Validation(_)
            | Self::SourceNotFound(_)
            | Self::TimedOut(_)
            | Self::NoChanges { .. } => None,
        }
    }

    pub(crate) fn git(stage: Stage) -> impl FnOnce(GitError) -> Self {
        move |source| Self::Git { stage, source }
    }

    pub(crate) fn io(stage: Stage) -> impl FnOnce(std::io::Error) -> Self {
        move |source| Self::Io { stage, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names_stage() {
        let err = PublishError::git(Stage::Clone)(GitError::InvalidUrl("ssh://x".to_owned()));
        assert_eq!(err.stage(), Some(Stage::Clone));
        assert!(err.to_string().starts_with("Cannot clone repository: "));
    }

    #[test]
    fn test_validation_has_no_stage() {
        assert_eq!(PublishError::Validation("x".to_owned()).stage(), None);
    }

    #[test]
    fn test_no_changes_names_branch() {
        let err = PublishError::NoChanges {
            branch: "gh-pages".to_owned(),
        };
        assert_eq!(err.stage(), None);
        assert_eq!(
            err.to_string(),
            "Nothing to publish: branch gh-pages already matches the site"
        );
    }
}
