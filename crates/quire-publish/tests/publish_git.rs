//! End-to-end publishing against a local bare repository.
//!
//! Skipped when no `git` binary is available.

use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use quire_publish::{PublishError, Publisher, PublisherConfig, Stage};
use quire_vcs::CliGitClient;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success())
}

fn git(cwd: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?}: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

/// Bare repository whose default branch is `gh-pages`.
fn bare_remote(root: &Path) -> String {
    let remote = root.join("remote.git");
    fs::create_dir_all(&remote).unwrap();
    git(&remote, &["init", "--quiet", "--bare"]);
    git(&remote, &["symbolic-ref", "HEAD", "refs/heads/gh-pages"]);
    remote.to_string_lossy().into_owned()
}

fn write_site(root: &Path) {
    fs::create_dir_all(root.join("blog/first")).unwrap();
    fs::write(root.join("index.html"), "<h1>Home</h1>").unwrap();
    fs::write(root.join("blog/index.html"), "<h1>Blog</h1>").unwrap();
    fs::write(root.join("blog/first/index.html"), "<h1>First</h1>").unwrap();
}

#[tokio::test]
async fn test_publish_then_plan() {
    if !git_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let remote = bare_remote(dir.path());
    let site = dir.path().join("site");
    write_site(&site);

    let publisher = Publisher::new(Arc::new(CliGitClient::new()));
    let config = PublisherConfig::new(remote.clone(), "gh-pages");

    let url = publisher
        .publish(&config, &site, Some("First publish"))
        .await
        .unwrap();
    let head = git(Path::new(&remote), &["rev-parse", "gh-pages"]);
    assert_eq!(url, format!("{remote}/commit/{}", head.trim()));

    let log = git(Path::new(&remote), &["log", "--format=%s", "gh-pages"]);
    assert_eq!(log.trim(), "First publish");

    let unchanged = publisher.plan(&config, &site).await.unwrap();
    assert!(unchanged.is_empty(), "{unchanged:?}");

    fs::remove_file(site.join("blog/first/index.html")).unwrap();
    fs::write(site.join("about.html"), "<h1>About</h1>").unwrap();
    let report = publisher.plan(&config, &site).await.unwrap();
    assert_eq!(report.removed, vec!["blog/first/index.html"]);
    assert_eq!(report.added, vec!["about.html"]);
    assert_eq!(report.summary, "Added: 1, Modified: 0, Removed: 1");

    // Planning never pushes.
    let log = git(Path::new(&remote), &["log", "--format=%s", "gh-pages"]);
    assert_eq!(log.lines().count(), 1);
}

#[tokio::test]
async fn test_publish_into_subdirectory() {
    if !git_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let remote = bare_remote(dir.path());
    let site = dir.path().join("site");
    write_site(&site);

    let config = PublisherConfig::new(remote.clone(), "gh-pages").with_pages_subdir("docs");
    Publisher::new(Arc::new(CliGitClient::new()))
        .publish(&config, &site, None)
        .await
        .unwrap();

    let files = git(
        Path::new(&remote),
        &["ls-tree", "-r", "--name-only", "gh-pages"],
    );
    assert_eq!(
        files.lines().collect::<Vec<_>>(),
        vec!["docs/blog/first/index.html", "docs/blog/index.html", "docs/index.html"]
    );
    let log = git(Path::new(&remote), &["log", "--format=%s", "gh-pages"]);
    assert_eq!(log.trim(), "Publish site");
}

#[tokio::test]
async fn test_clone_failure_names_stage() {
    if !git_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let site = dir.path().join("site");
    write_site(&site);
    let missing = dir.path().join("missing.git");

    let err = Publisher::new(Arc::new(CliGitClient::new()))
        .publish(
            &PublisherConfig::new(missing.to_string_lossy(), "gh-pages"),
            &site,
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::Git { .. }));
    assert_eq!(err.stage(), Some(Stage::Clone));
}

#[tokio::test]
async fn test_plan_reports_moved_and_spaced_paths() {
    if !git_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let remote = bare_remote(dir.path());
    let site = dir.path().join("site");
    fs::create_dir_all(site.join("old")).unwrap();
    fs::write(site.join("old/index.html"), "<h1>Page</h1>").unwrap();

    let publisher = Publisher::new(Arc::new(CliGitClient::new()));
    let config = PublisherConfig::new(remote, "gh-pages");
    publisher.publish(&config, &site, None).await.unwrap();

    fs::create_dir_all(site.join("new")).unwrap();
    fs::rename(site.join("old/index.html"), site.join("new/index.html")).unwrap();
    fs::remove_dir(site.join("old")).unwrap();
    fs::write(site.join("my page.html"), "<h1>Spaced</h1>").unwrap();

    let report = publisher.plan(&config, &site).await.unwrap();
    assert_eq!(report.removed, vec!["old/index.html"]);
    assert_eq!(report.added, vec!["my page.html", "new/index.html"]);
    assert!(report.modified.is_empty());
    assert_eq!(report.summary, "Added: 2, Modified: 0, Removed: 1");
}

#[tokio::test]
async fn test_republishing_unchanged_site() {
    if !git_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let remote = bare_remote(dir.path());
    let site = dir.path().join("site");
    write_site(&site);

    let publisher = Publisher::new(Arc::new(CliGitClient::new()));
    let config = PublisherConfig::new(remote.clone(), "gh-pages");
    publisher.publish(&config, &site, None).await.unwrap();

    let err = publisher.publish(&config, &site, None).await.unwrap_err();
    assert!(matches!(err, PublishError::NoChanges { .. }), "{err}");

    let log = git(Path::new(&remote), &["log", "--format=%s", "gh-pages"]);
    assert_eq!(log.lines().count(), 1);
}
