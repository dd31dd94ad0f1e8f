//! Git client backed by the `git` binary.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tokio::process::Command;

use crate::client::{CommitIdentity, GitAuth, GitClient};
use crate::error::GitError;

/// Characters escaped in the user-info part of a URL.
const USERINFO: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// User name paired with token credentials.
const TOKEN_USER: &str = "oauth2";

/// Runs `git` subcommands through `tokio::process`.
///
/// Child processes never prompt for credentials and are killed when the
/// calling future is dropped.
#[derive(Clone, Debug)]
pub struct CliGitClient {
    program: String,
}

impl Default for CliGitClient {
    fn default() -> Self {
        Self {
            program: "git".to_owned(),
        }
    }
}

impl CliGitClient {
    /// Create a client running `git` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    async fn run(&self, cwd: Option<&Path>, args: &[&str]) -> Result<String, GitError> {
        let command = format!("{} {}", self.program, args.join(" "));

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(cwd) = cwd {
            cmd.current_dir(cwd);
        }

        tracing::debug!(command = %command, "Running git");
        let output = cmd
            .output()
            .await
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostic = if stderr.trim().is_empty() {
                String::from_utf8_lossy(&output.stdout)
            } else {
                stderr
            };
            return Err(GitError::Command {
                command,
                code: output.status.code(),
                output: diagnostic.into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl GitClient for CliGitClient {
    async fn clone_repo(&self, url: &str, dest: &Path, auth: &GitAuth) -> Result<(), GitError> {
        let url = authenticated_url(url, auth)?;
        let dest = dest.to_string_lossy();
        let result = self.run(None, &["clone", "--quiet", url.as_str(), dest.as_ref()]).await;
        match auth {
            GitAuth::Token(token) => result
                .map(drop)
                .map_err(|e| e.redact(&encode_userinfo(token))),
            GitAuth::Agent => result.map(drop),
        }
    }

    async fn checkout(&self, repo: &Path, branch: &str, create: bool) -> Result<(), GitError> {
        match self.run(Some(repo), &["checkout", "--quiet", branch]).await {
            Ok(_) => Ok(()),
            Err(GitError::Command { .. }) if create => {
                tracing::debug!(branch, "Branch not found, creating it");
                self.run(Some(repo), &["checkout", "--quiet", "-b", branch])
                    .await
                    .map(drop)
            }
            Err(e) => Err(e),
        }
    }

    async fn add(&self, repo: &Path, pathspec: &str) -> Result<(), GitError> {
        self.run(Some(repo), &["add", "--all", "--", pathspec])
            .await
            .map(drop)
    }

    async fn commit(&self, repo: &Path, identity: &CommitIdentity) -> Result<String, GitError> {
        self.run(Some(repo), &["config", "user.name", identity.name.as_str()])
            .await?;
        self.run(Some(repo), &["config", "user.email", identity.email.as_str()])
            .await?;
        // Exit code 1 means the index differs from HEAD.
        match self.run(Some(repo), &["diff", "--cached", "--quiet"]).await {
            Ok(_) => return Err(GitError::NothingToCommit),
            Err(GitError::Command { code: Some(1), .. }) => {}
            Err(e) => return Err(e),
        }
        self.run(Some(repo), &["commit", "--quiet", "-m", identity.message.as_str()])
            .await?;
        let hash = self.run(Some(repo), &["rev-parse", "HEAD"]).await?;
        Ok(hash.trim().to_owned())
    }

    async fn push(&self, repo: &Path, branch: &str, auth: &GitAuth) -> Result<(), GitError> {
        let result = self
            .run(
                Some(repo),
                &["push", "--quiet", "--set-upstream", "origin", branch],
            )
            .await;
        match auth {
            GitAuth::Token(token) => result
                .map(drop)
                .map_err(|e| e.redact(&encode_userinfo(token))),
            GitAuth::Agent => result.map(drop),
        }
    }

    async fn status(&self, repo: &Path) -> Result<String, GitError> {
        self.run(
            Some(repo),
            &["status", "--porcelain", "-z", "--no-renames", "--untracked-files=all"],
        )
        .await
    }
}

/// Build the URL to clone from.
///
/// A token is embedded as the URL's user info (`https://oauth2:<token>@host/...`),
/// replacing any user info already present. Tokens are only accepted for
/// HTTP(S) remotes. An empty token or agent credentials leave the URL as-is.
pub fn authenticated_url(url: &str, auth: &GitAuth) -> Result<String, GitError> {
    let token = match auth {
        GitAuth::Token(token) if !token.is_empty() => token,
        GitAuth::Token(_) | GitAuth::Agent => return Ok(url.to_owned()),
    };

    let Some((scheme, rest)) = url.split_once("://") else {
        return Err(GitError::InvalidUrl(url.to_owned()));
    };
    if !scheme.eq_ignore_ascii_case("https") && !scheme.eq_ignore_ascii_case("http") {
        return Err(GitError::InvalidUrl(url.to_owned()));
    }

    let authority_end = rest.find('/').unwrap_or(rest.len());
    let host_and_path = match rest[..authority_end].rfind('@') {
        Some(at) => &rest[at + 1..],
        None => rest,
    };
    if host_and_path.is_empty() {
        return Err(GitError::InvalidUrl(url.to_owned()));
    }

    Ok(format!(
        "{scheme}://{TOKEN_USER}:{}@{host_and_path}",
        encode_userinfo(token)
    ))
}

fn encode_userinfo(value: &str) -> String {
    utf8_percent_encode(value, USERINFO).to_string()
}
