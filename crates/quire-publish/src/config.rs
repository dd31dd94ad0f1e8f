//! Publisher configuration.

use std::path::{Component, Path};
use std::time::Duration;

use quire_vcs::{CommitIdentity, GitAuth};

use crate::error::PublishError;

/// Where and how to publish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublisherConfig {
    /// Remote repository URL.
    pub repo_url: String,
    /// Branch receiving the site, created when missing.
    pub branch: String,
    /// Directory inside the repository holding the site; empty for the root.
    pub pages_subdir: String,
    pub auth: GitAuth,
    pub commit: CommitIdentity,
    /// Deadline for a whole publish or plan run.
    pub timeout: Option<Duration>,
}

impl PublisherConfig {
    /// Create a configuration publishing to the root of `branch` with agent
    /// credentials and a default commit identity.
    #[must_use]
    pub fn new(repo_url: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            branch: branch.into(),
            pages_subdir: String::new(),
            auth: GitAuth::Agent,
            commit: CommitIdentity {
                name: "Quire".to_owned(),
                email: "quire@localhost".to_owned(),
                message: "Publish site".to_owned(),
            },
            timeout: None,
        }
    }

    /// Publish into a subdirectory of the repository.
    #[must_use]
    pub fn with_pages_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.pages_subdir = subdir.into();
        self
    }

    /// Set the credentials.
    #[must_use]
    pub fn with_auth(mut self, auth: GitAuth) -> Self {
        self.auth = auth;
        self
    }

    /// Set the commit identity.
    #[must_use]
    pub fn with_commit(mut self, commit: CommitIdentity) -> Self {
        self.commit = commit;
        self
    }

    /// Abort runs taking longer than `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check required fields and the subdirectory.
    ///
    /// The subdirectory must be relative and must not contain `..`.
    pub fn validate(&self) -> Result<(), PublishError> {
        if self.repo_url.trim().is_empty() {
            return Err(PublishError::Validation("repo URL cannot be empty".to_owned()));
        }
        if self.branch.trim().is_empty() {
            return Err(PublishError::Validation(
                "publish branch cannot be empty".to_owned(),
            ));
        }
        let subdir = Path::new(&self.pages_subdir);
        if !subdir
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(PublishError::Validation(format!(
                "pages subdirectory must be a relative path inside the repository, got {:?}",
                self.pages_subdir
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PublisherConfig {
        PublisherConfig::new("https://github.com/acme/site", "gh-pages")
    }

    #[test]
    fn test_validate_ok() {
        assert!(config().validate().is_ok());
        assert!(config().with_pages_subdir("docs/site").validate().is_ok());
        assert!(config().with_pages_subdir("./docs").validate().is_ok());
    }

    #[test]
    fn test_validate_empty_repo_url() {
        let err = PublisherConfig::new("", "main").validate().unwrap_err();
        assert!(matches!(err, PublishError::Validation(_)));
        assert!(err.to_string().contains("repo URL"));
    }

    #[test]
    fn test_validate_empty_branch() {
        let err = PublisherConfig::new("https://host/repo", "  ")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("branch"));
    }

    #[test]
    fn test_validate_rejects_escaping_subdir() {
        for subdir in ["../other", "docs/../../x", "/abs"] {
            let err = config().with_pages_subdir(subdir).validate().unwrap_err();
            assert!(matches!(err, PublishError::Validation(_)), "{subdir}");
        }
    }
}
