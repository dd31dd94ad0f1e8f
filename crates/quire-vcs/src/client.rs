//! Git client abstraction.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;

use crate::error::GitError;

/// How the client authenticates against the remote.
#[derive(Clone, PartialEq, Eq)]
pub enum GitAuth {
    /// HTTPS access token, embedded into the clone URL.
    Token(String),
    /// Ambient credentials (SSH agent, credential helper). The URL is used as-is.
    Agent,
}

impl fmt::Debug for GitAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token(***)"),
            Self::Agent => f.write_str("Agent"),
        }
    }
}

/// Author identity and message of a commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Version control operations needed to publish a site.
///
/// Every method runs to completion or returns an error; implementations do
/// not retry. Dropping a returned future cancels the operation.
#[async_trait]
pub trait GitClient: Send + Sync {
    /// Clone `url` into `dest`, which must not exist yet.
    async fn clone_repo(&self, url: &str, dest: &Path, auth: &GitAuth) -> Result<(), GitError>;

    /// Switch `repo` to `branch`, creating it when `create` is set and the
    /// branch does not exist.
    async fn checkout(&self, repo: &Path, branch: &str, create: bool) -> Result<(), GitError>;

    /// Stage changes matching `pathspec`.
    async fn add(&self, repo: &Path, pathspec: &str) -> Result<(), GitError>;

    /// Commit staged changes as `identity`, returning the new commit hash.
    ///
    /// Fails with [`GitError::NothingToCommit`] when nothing is staged.
    async fn commit(&self, repo: &Path, identity: &CommitIdentity) -> Result<String, GitError>;

    /// Push `branch` to `origin`.
    async fn push(&self, repo: &Path, branch: &str, auth: &GitAuth) -> Result<(), GitError>;

    /// Working tree status as porcelain v1 records.
    ///
    /// Records are `XY path`, separated by NUL. Paths are not quoted and
    /// renames are reported as a deletion plus an addition.
    async fn status(&self, repo: &Path) -> Result<String, GitError>;
}
