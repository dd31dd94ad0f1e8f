//! In-memory git client for testing.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::client::{CommitIdentity, GitAuth, GitClient};
use crate::error::GitError;

/// A [`GitClient`] operation, used to select which call fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GitOperation {
    Clone,
    Checkout,
    Add,
    Commit,
    Push,
    Status,
}

/// A recorded call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GitCall {
    Clone { url: String, dest: PathBuf, auth: GitAuth },
    Checkout { repo: PathBuf, branch: String, create: bool },
    Add { repo: PathBuf, pathspec: String },
    Commit { repo: PathBuf, identity: CommitIdentity },
    Push { repo: PathBuf, branch: String },
    Status { repo: PathBuf },
}

impl GitCall {
    /// The operation this call performed.
    #[must_use]
    pub fn operation(&self) -> GitOperation {
        match self {
            Self::Clone { .. } => GitOperation::Clone,
            Self::Checkout { .. } => GitOperation::Checkout,
            Self::Add { .. } => GitOperation::Add,
            Self::Commit { .. } => GitOperation::Commit,
            Self::Push { .. } => GitOperation::Push,
            Self::Status { .. } => GitOperation::Status,
        }
    }
}

/// Mock git client.
///
/// Records every call. `clone_repo` creates the destination directory so
/// callers can write into the "checkout". Use the builder methods to make an
/// operation fail or to script commit hashes and status output.
///
/// # Example
///
/// ```ignore
/// use quire_vcs::{GitOperation, MockGitClient};
///
/// let git = MockGitClient::new()
///     .with_commit_hash("abc123")
///     .failing_at(GitOperation::Push);
/// ```
#[derive(Debug)]
pub struct MockGitClient {
    calls: RwLock<Vec<GitCall>>,
    fail_at: Option<GitOperation>,
    commit_hash: String,
    status: String,
    clean: bool,
}

impl Default for MockGitClient {
    fn default() -> Self {
        Self {
            calls: RwLock::new(Vec::new()),
            fail_at: None,
            commit_hash: "0000000000000000000000000000000000000000".to_owned(),
            status: String::new(),
            clean: false,
        }
    }
}

impl MockGitClient {
    /// Create a mock where every operation succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `operation` fail with a command error.
    #[must_use]
    pub fn failing_at(mut self, operation: GitOperation) -> Self {
        self.fail_at = Some(operation);
        self
    }

    /// Hash returned by `commit`.
    #[must_use]
    pub fn with_commit_hash(mut self, hash: impl Into<String>) -> Self {
        self.commit_hash = hash.into();
        self
    }

    /// Output returned by `status`.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Make `commit` report that nothing is staged.
    #[must_use]
    pub fn with_clean_tree(mut self) -> Self {
        self.clean = true;
        self
    }

    /// All calls so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of calls of `operation` so far.
    #[must_use]
    pub fn count(&self, operation: GitOperation) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    fn record(&self, call: GitCall) -> Result<(), GitError> {
        let operation = call.operation();
        self.calls.write().unwrap().push(call);
        if self.fail_at == Some(operation) {
            return Err(GitError::Command {
                command: format!("git {operation:?}").to_lowercase(),
                code: Some(128),
                output: "fatal: mock failure".to_owned(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl GitClient for MockGitClient {
    async fn clone_repo(&self, url: &str, dest: &Path, auth: &GitAuth) -> Result<(), GitError> {
        self.record(GitCall::Clone {
            url: url.to_owned(),
            dest: dest.to_path_buf(),
            auth: auth.clone(),
        })?;
        std::fs::create_dir_all(dest).map_err(|source| GitError::Spawn {
            command: "git clone".to_owned(),
            source,
        })
    }

    async fn checkout(&self, repo: &Path, branch: &str, create: bool) -> Result<(), GitError> {
        self.record(GitCall::Checkout {
            repo: repo.to_path_buf(),
            branch: branch.to_owned(),
            create,
        })
    }

    async fn add(&self, repo: &Path, pathspec: &str) -> Result<(), GitError> {
        self.record(GitCall::Add {
            repo: repo.to_path_buf(),
            pathspec: pathspec.to_owned(),
        })
    }

    async fn commit(&self, repo: &Path, identity: &CommitIdentity) -> Result<String, GitError> {
        self.record(GitCall::Commit {
            repo: repo.to_path_buf(),
            identity: identity.clone(),
        })?;
        if self.clean {
            return Err(GitError::NothingToCommit);
        }
        Ok(self.commit_hash.clone())
    }

    async fn push(&self, repo: &Path, branch: &str, _auth: &GitAuth) -> Result<(), GitError> {
        self.record(GitCall::Push {
            repo: repo.to_path_buf(),
            branch: branch.to_owned(),
        })
    }

    async fn status(&self, repo: &Path) -> Result<String, GitError> {
        self.record(GitCall::Status {
            repo: repo.to_path_buf(),
        })?;
        Ok(self.status.clone())
    }
}
