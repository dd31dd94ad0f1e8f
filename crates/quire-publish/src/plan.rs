//! Dry-run reports.

use serde::Serialize;

/// Changes a publish would make, relative to the remote branch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PlanReport {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub removed: Vec<String>,
    /// `"Added: N, Modified: N, Removed: N"`.
    pub summary: String,
}

impl PlanReport {
    /// Whether publishing would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }
}

/// Parse porcelain v1 status records into a report.
///
/// Records are NUL-separated (`git status --porcelain -z`) and paths are taken
/// verbatim. Output without any NUL is read line by line instead. Rename
/// records are not understood, so status must be read with `--no-renames`.
///
/// Staged additions and untracked files count as added, staged modifications
/// as modified, staged deletions as removed. Other codes and records shorter
/// than three characters are ignored.
///
/// ```
/// use quire_publish::parse_status;
///
/// let report = parse_status("A  my page.html\0 D unstaged.html\0");
/// assert_eq!(report.added, vec!["my page.html"]);
/// assert_eq!(report.summary, "Added: 1, Modified: 0, Removed: 0");
/// ```
#[must_use]
pub fn parse_status(output: &str) -> PlanReport {
    let mut report = PlanReport::default();

    let records: Vec<&str> = if output.contains('\0') {
        output.split('\0').collect()
    } else {
        output.lines().collect()
    };
    for record in records {
        let (Some(code), Some(path)) = (record.get(..2), record.get(3..)) else {
            continue;
        };
        let path = path.to_owned();
        match code {
            "A " | "??" => report.added.push(path),
            "M " => report.modified.push(path),
            "D " => report.removed.push(path),
            _ => {}
        }
    }

    report.summary = format!(
        "Added: {}, Modified: {}, Removed: {}",
        report.added.len(),
        report.modified.len(),
        report.removed.len()
    );
    report
}
