//! Publish and plan orchestration.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use quire_vcs::{CommitIdentity, GitClient, GitError};
use tempfile::TempDir;

use crate::config::PublisherConfig;
use crate::error::{PublishError, Stage};
use crate::plan::{PlanReport, parse_status};
use crate::staging::{clear_dir, copy_tree};

/// Directory name of the clone inside the temporary workspace.
const CLONE_DIR: &str = "repo";

/// A fresh clone with the site copied in and staged.
///
/// The clone lives in a temporary directory removed when this is dropped.
struct Checkout {
    _workspace: TempDir,
    repo: PathBuf,
}

/// Publishes generated sites through a [`GitClient`].
///
/// Each call works in its own temporary clone. Concurrent calls against the
/// same remote branch are not coordinated and may fail at push time.
pub struct Publisher {
    git: Arc<dyn GitClient>,
}

impl Publisher {
    /// Create a publisher using `git` for all repository access.
    #[must_use]
    pub fn new(git: Arc<dyn GitClient>) -> Self {
        Self { git }
    }

    /// Check a configuration without touching the filesystem or remote.
    pub fn validate(&self, config: &PublisherConfig) -> Result<(), PublishError> {
        config.validate()
    }

    /// Publish `source_dir` and return the URL of the new commit.
    ///
    /// `message` replaces the configured commit message when non-empty. When
    /// the staged site matches the branch, nothing is committed or pushed and
    /// [`PublishError::NoChanges`] is returned.
    pub async fn publish(
        &self,
        config: &PublisherConfig,
        source_dir: &Path,
        message: Option<&str>,
    ) -> Result<String, PublishError> {
        preflight(config, source_dir)?;
        tracing::info!(repo = %config.repo_url, branch = %config.branch, "Starting publish");

        with_deadline(config.timeout, async {
            let checkout = self.prepare(config, source_dir).await?;

            let identity = CommitIdentity {
                message: message
                    .filter(|m| !m.trim().is_empty())
                    .map_or_else(|| config.commit.message.clone(), str::to_owned),
                ..config.commit.clone()
            };
            let hash = match self.git.commit(&checkout.repo, &identity).await {
                Ok(hash) => hash,
                Err(GitError::NothingToCommit) => {
                    tracing::info!(branch = %config.branch, "Site unchanged, nothing to publish");
                    return Err(PublishError::NoChanges {
                        branch: config.branch.clone(),
                    });
                }
                Err(e) => return Err(PublishError::git(Stage::Commit)(e)),
            };
            tracing::info!(hash = %hash, "Committed changes");

            self.git
                .push(&checkout.repo, &config.branch, &config.auth)
                .await
                .map_err(PublishError::git(Stage::Push))?;

            let url = commit_url(&config.repo_url, &hash);
            tracing::info!(commit_url = %url, "Publish completed");
            Ok(url)
        })
        .await
    }

    /// Report what publishing `source_dir` would change, without committing
    /// or pushing.
    pub async fn plan(
        &self,
        config: &PublisherConfig,
        source_dir: &Path,
    ) -> Result<PlanReport, PublishError> {
        preflight(config, source_dir)?;
        tracing::info!(repo = %config.repo_url, branch = %config.branch, "Starting plan");

        with_deadline(config.timeout, async {
            let checkout = self.prepare(config, source_dir).await?;

            let status = self
                .git
                .status(&checkout.repo)
                .await
                .map_err(PublishError::git(Stage::Status))?;
            let report = parse_status(&status);

            tracing::info!(summary = %report.summary, "Plan completed");
            Ok(report)
        })
        .await
    }

    /// Clone, check out the branch, replace the target directory with the
    /// site and stage everything.
    async fn prepare(
        &self,
        config: &PublisherConfig,
        source_dir: &Path,
    ) -> Result<Checkout, PublishError> {
        let workspace = tempfile::Builder::new()
            .prefix("quire-publish-")
            .tempdir()
            .map_err(PublishError::io(Stage::Workspace))?;
        let repo = workspace.path().join(CLONE_DIR);
        tracing::debug!(path = %workspace.path().display(), "Created workspace");

        self.git
            .clone_repo(&config.repo_url, &repo, &config.auth)
            .await
            .map_err(PublishError::git(Stage::Clone))?;
        tracing::info!("Cloned repository");

        self.git
            .checkout(&repo, &config.branch, true)
            .await
            .map_err(PublishError::git(Stage::Checkout))?;
        tracing::info!(branch = %config.branch, "Checked out branch");

        let target = repo.join(&config.pages_subdir);
        clear_dir(&target).map_err(PublishError::io(Stage::Clean))?;
        let files = copy_tree(source_dir, &target).map_err(PublishError::io(Stage::Copy))?;
        tracing::info!(files, target = %target.display(), "Copied site");

        self.git
            .add(&repo, ".")
            .await
            .map_err(PublishError::git(Stage::Add))?;
        tracing::info!("Staged changes");

        Ok(Checkout {
            _workspace: workspace,
            repo,
        })
    }
}

/// Checks done before any side effect.
fn preflight(config: &PublisherConfig, source_dir: &Path) -> Result<(), PublishError> {
    config.validate()?;
    if !source_dir.is_dir() {
        return Err(PublishError::SourceNotFound(source_dir.to_path_buf()));
    }
    Ok(())
}

async fn with_deadline<T>(
    timeout: Option<Duration>,
    run: impl Future<Output = Result<T, PublishError>>,
) -> Result<T, PublishError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, run)
            .await
            .map_err(|_| PublishError::TimedOut(limit))?,
        None => run.await,
    }
}

fn commit_url(repo_url: &str, hash: &str) -> String {
    format!("{}/commit/{hash}", repo_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use quire_vcs::{GitAuth, GitCall, GitOperation, MockGitClient};

    const REPO: &str = "https://github.com/acme/site";

    fn config() -> PublisherConfig {
        PublisherConfig::new(REPO, "gh-pages").with_commit(CommitIdentity {
            name: "Bot".to_owned(),
            email: "bot@acme.test".to_owned(),
            message: "Publish site".to_owned(),
        })
    }

    fn site() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Home</h1>").unwrap();
        std::fs::create_dir_all(dir.path().join("blog")).unwrap();
        std::fs::write(dir.path().join("blog/index.html"), "<h1>Blog</h1>").unwrap();
        dir
    }

    fn publisher(git: &Arc<MockGitClient>) -> Publisher {
        Publisher::new(Arc::<MockGitClient>::clone(git))
    }

    fn clone_dest(git: &MockGitClient) -> PathBuf {
        git.calls()
            .into_iter()
            .find_map(|call| match call {
                GitCall::Clone { dest, .. } => Some(dest),
                _ => None,
            })
            .unwrap()
    }

    #[tokio::test]
    async fn test_publish_returns_commit_url() {
        let git = Arc::new(MockGitClient::new().with_commit_hash("abc123"));
        let publisher = publisher(&git);
        let site = site();

        let url = publisher.publish(&config(), site.path(), None).await.unwrap();

        assert_eq!(url, "https://github.com/acme/site/commit/abc123");
        let operations: Vec<GitOperation> = git.calls().iter().map(GitCall::operation).collect();
        assert_eq!(
            operations,
            vec![
                GitOperation::Clone,
                GitOperation::Checkout,
                GitOperation::Add,
                GitOperation::Commit,
                GitOperation::Push,
            ]
        );
    }

    #[tokio::test]
    async fn test_publish_call_arguments() {
        let git = Arc::new(MockGitClient::new());
        let publisher = publisher(&git);
        let site = site();
        let config = config().with_auth(GitAuth::Token("tok".to_owned()));

        publisher.publish(&config, site.path(), None).await.unwrap();

        let calls = git.calls();
        let repo = clone_dest(&git);
        assert_eq!(
            calls[0],
            GitCall::Clone {
                url: REPO.to_owned(),
                dest: repo.clone(),
                auth: GitAuth::Token("tok".to_owned()),
            }
        );
        assert_eq!(
            calls[1],
            GitCall::Checkout {
                repo: repo.clone(),
                branch: "gh-pages".to_owned(),
                create: true,
            }
        );
        assert_eq!(
            calls[2],
            GitCall::Add {
                repo: repo.clone(),
                pathspec: ".".to_owned(),
            }
        );
        assert_eq!(
            calls[4],
            GitCall::Push {
                repo,
                branch: "gh-pages".to_owned(),
            }
        );
    }

    #[tokio::test]
    async fn test_publish_removes_workspace() {
        let git = Arc::new(MockGitClient::new());
        let site = site();

        publisher(&git)
            .publish(&config(), site.path(), None)
            .await
            .unwrap();

        let repo = clone_dest(&git);
        assert!(!repo.exists());
        assert!(!repo.parent().unwrap().exists());
    }

    #[tokio::test]
    async fn test_clone_failure_stops_publish() {
        let git = Arc::new(MockGitClient::new().failing_at(GitOperation::Clone));
        let site = site();

        let err = publisher(&git)
            .publish(&config(), site.path(), None)
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Clone));
        assert!(err.to_string().contains("clone"));
        for operation in [
            GitOperation::Checkout,
            GitOperation::Add,
            GitOperation::Commit,
            GitOperation::Push,
        ] {
            assert_eq!(git.count(operation), 0, "{operation:?}");
        }
        assert!(!clone_dest(&git).parent().unwrap().exists());
    }

    #[tokio::test]
    async fn test_commit_failure_never_pushes() {
        let git = Arc::new(MockGitClient::new().failing_at(GitOperation::Commit));
        let site = site();

        let err = publisher(&git)
            .publish(&config(), site.path(), None)
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Commit));
        assert_eq!(git.count(GitOperation::Push), 0);
        assert!(!clone_dest(&git).exists());
    }

    #[tokio::test]
    async fn test_push_failure_reported() {
        let git = Arc::new(MockGitClient::new().failing_at(GitOperation::Push));
        let site = site();

        let err = Publisher::new(git)
            .publish(&config(), site.path(), None)
            .await
            .unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Push));
        assert!(err.to_string().starts_with("Cannot push changes"));
    }

    #[tokio::test]
    async fn test_unchanged_site_is_not_pushed() {
        let git = Arc::new(MockGitClient::new().with_clean_tree());
        let site = site();

        let err = publisher(&git)
            .publish(&config(), site.path(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::NoChanges { ref branch } if branch == "gh-pages"));
        assert_eq!(git.count(GitOperation::Commit), 1);
        assert_eq!(git.count(GitOperation::Push), 0);
        assert!(!clone_dest(&git).exists());
    }

    #[tokio::test]
    async fn test_validation_has_no_side_effects() {
        let git = Arc::new(MockGitClient::new());
        let publisher = publisher(&git);
        let site = site();

        let err = publisher
            .publish(&PublisherConfig::new("", "gh-pages"), site.path(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::Validation(_)));

        let err = publisher
            .plan(&PublisherConfig::new(REPO, ""), site.path())
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::Validation(_)));

        assert!(git.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_source_dir() {
        let git = Arc::new(MockGitClient::new());
        let err = publisher(&git)
            .publish(&config(), Path::new("/nonexistent/quire-site"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::SourceNotFound(_)));
        assert!(git.calls().is_empty());
    }

    #[tokio::test]
    async fn test_commit_message_override() {
        let git = Arc::new(MockGitClient::new());
        let publisher = publisher(&git);
        let site = site();

        publisher
            .publish(&config(), site.path(), Some("Fix typo"))
            .await
            .unwrap();
        publisher
            .publish(&config(), site.path(), Some("  "))
            .await
            .unwrap();

        let messages: Vec<String> = git
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                GitCall::Commit { identity, .. } => Some(identity.message),
                _ => None,
            })
            .collect();
        assert_eq!(messages, vec!["Fix typo", "Publish site"]);
    }

    #[tokio::test]
    async fn test_plan_parses_status() {
        let git = Arc::new(
            MockGitClient::new().with_status("A  new.html\nM  index.html\n?? draft.html\n"),
        );
        let site = site();

        let report = publisher(&git)
            .plan(&config(), site.path())
            .await
            .unwrap();

        assert_eq!(report.added, vec!["new.html", "draft.html"]);
        assert_eq!(report.modified, vec!["index.html"]);
        assert!(report.removed.is_empty());
        assert_eq!(git.count(GitOperation::Status), 1);
        assert_eq!(git.count(GitOperation::Commit), 0);
        assert_eq!(git.count(GitOperation::Push), 0);
    }

    #[tokio::test]
    async fn test_plan_is_repeatable() {
        let git = Arc::new(MockGitClient::new().with_status("D  old.html\0"));
        let publisher = Publisher::new(git);
        let site = site();

        let first = publisher.plan(&config(), site.path()).await.unwrap();
        let second = publisher.plan(&config(), site.path()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.removed, vec!["old.html"]);
    }

    #[tokio::test]
    async fn test_plan_status_failure() {
        let git = Arc::new(MockGitClient::new().failing_at(GitOperation::Status));
        let site = site();

        let err = Publisher::new(git)
            .plan(&config(), site.path())
            .await
            .unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Status));
    }

    /// Client whose clone never finishes in time.
    struct SlowGit;

    #[async_trait]
    impl GitClient for SlowGit {
        async fn clone_repo(&self, _: &str, _: &Path, _: &GitAuth) -> Result<(), GitError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }

        async fn checkout(&self, _: &Path, _: &str, _: bool) -> Result<(), GitError> {
            Ok(())
        }

        async fn add(&self, _: &Path, _: &str) -> Result<(), GitError> {
            Ok(())
        }

        async fn commit(&self, _: &Path, _: &CommitIdentity) -> Result<String, GitError> {
            Ok(String::new())
        }

        async fn push(&self, _: &Path, _: &str, _: &GitAuth) -> Result<(), GitError> {
            Ok(())
        }

        async fn status(&self, _: &Path) -> Result<String, GitError> {
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn test_timeout() {
        let site = site();
        let config = config().with_timeout(Duration::from_millis(20));

        let err = Publisher::new(Arc::new(SlowGit))
            .publish(&config, site.path(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::TimedOut(_)));
    }

    #[test]
    fn test_commit_url() {
        assert_eq!(commit_url(REPO, "abc"), "https://github.com/acme/site/commit/abc");
        assert_eq!(
            commit_url("https://github.com/acme/site/", "abc"),
            "https://github.com/acme/site/commit/abc"
        );
    }
}
