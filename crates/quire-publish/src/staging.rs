//! Copying the generated site into the checkout.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Name of the git metadata directory, never touched when staging.
const GIT_DIR: &str = ".git";

/// Empty `target`, creating it if needed.
///
/// A `.git` entry directly inside `target` is kept, so the checkout root can
/// be cleared without destroying the repository.
pub(crate) fn clear_dir(target: &Path) -> io::Result<()> {
    if !target.exists() {
        return fs::create_dir_all(target);
    }
    if !target.is_dir() {
        fs::remove_file(target)?;
        return fs::create_dir_all(target);
    }

    for entry in fs::read_dir(target)? {
        let entry = entry?;
        if entry.file_name() == GIT_DIR {
            continue;
        }
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// Recursively copy the contents of `source` into `target`.
///
/// Relative paths and file permissions are preserved. A `.git` directory at
/// the top of `source` is skipped. Returns the number of files copied.
pub(crate) fn copy_tree(source: &Path, target: &Path) -> io::Result<usize> {
    let mut copied = 0;
    let walker = WalkDir::new(source)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_name() == GIT_DIR));

    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| io::Error::other(e.to_string()))?;
        let dest = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
            tracing::debug!(path = %relative.display(), "Staged file");
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_clear_dir_keeps_git() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join(".git/HEAD"), "ref: refs/heads/main");
        write(&root.join("index.html"), "old");
        write(&root.join("blog/index.html"), "old");

        clear_dir(root).unwrap();

        let mut left: Vec<_> = fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        left.sort();
        assert_eq!(left, vec![".git"]);
        assert!(root.join(".git/HEAD").exists());
    }

    #[test]
    fn test_clear_dir_creates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("docs/site");

        clear_dir(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_copy_tree() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("site");
        let target = dir.path().join("repo");
        write(&source.join("index.html"), "home");
        write(&source.join("news/first/index.html"), "first");
        write(&source.join(".git/config"), "ignored");
        fs::create_dir_all(source.join("empty")).unwrap();
        fs::create_dir_all(&target).unwrap();

        let copied = copy_tree(&source, &target).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(target.join("index.html")).unwrap(), "home");
        assert_eq!(
            fs::read_to_string(target.join("news/first/index.html")).unwrap(),
            "first"
        );
        assert!(target.join("empty").is_dir());
        assert!(!target.join(".git").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_tree_preserves_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("site");
        let target = dir.path().join("repo");
        write(&source.join("run.sh"), "#!/bin/sh");
        fs::set_permissions(source.join("run.sh"), fs::Permissions::from_mode(0o755)).unwrap();

        copy_tree(&source, &target).unwrap();

        let mode = fs::metadata(target.join("run.sh")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
