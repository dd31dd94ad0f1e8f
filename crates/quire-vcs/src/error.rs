//! Git error type.

/// Error returned by [`GitClient`](crate::GitClient) operations.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    /// The `git` process could not be started.
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    /// `git` exited unsuccessfully.
    ///
    /// `output` is the diagnostic git printed: stderr, or stdout when stderr
    /// was empty.
    #[error("`{command}` failed ({}): {}", exit_code(*.code), .output.trim())]
    Command {
        command: String,
        code: Option<i32>,
        output: String,
    },
    /// A commit was requested but nothing is staged.
    #[error("Nothing to commit, the working tree matches HEAD")]
    NothingToCommit,
    /// A token credential was given for a remote that is not HTTP(S).
    #[error("Cannot embed a token into remote URL {0}")]
    InvalidUrl(String),
}

impl GitError {
    /// Replace every occurrence of `secret` in the error text.
    #[must_use]
    pub(crate) fn redact(self, secret: &str) -> Self {
        if secret.is_empty() {
            return self;
        }
        let hide = |s: String| s.replace(secret, "***");
        match self {
            Self::Spawn { command, source } => Self::Spawn {
                command: hide(command),
                source,
            },
            Self::Command {
                command,
                code,
                output,
            } => Self::Command {
                command: hide(command),
                code,
                output: hide(output),
            },
            Self::InvalidUrl(url) => Self::InvalidUrl(hide(url)),
            Self::NothingToCommit => Self::NothingToCommit,
        }
    }
}

fn exit_code(code: Option<i32>) -> String {
    code.map_or_else(|| "killed by signal".to_owned(), |c| format!("exit code {c}"))
}
