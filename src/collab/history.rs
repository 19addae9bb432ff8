// src/collab/history.rs
//! Revision history access through the `git` command line.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use super::process::run_bounded;
use crate::error::{LayerError, Result};

const GIT: &str = "git";
const GIT_TIMEOUT: Duration = Duration::from_secs(60);

/// Source of changed-file lists per revision.
pub trait RevisionHistory {
    /// Paths touched by `revision`, relative to the repository root.
    ///
    /// # Errors
    /// Returns `Collaborator` if the history cannot be queried.
    fn changed_files(&self, revision: &str) -> Result<Vec<PathBuf>>;

    /// Identifier of the most recent revision.
    ///
    /// # Errors
    /// Returns `Collaborator` if the history cannot be queried or is empty.
    fn last_revision(&self) -> Result<String>;

    /// One-line summary of `revision`, shown in report headers.
    ///
    /// # Errors
    /// Returns `Collaborator` if the history cannot be queried.
    fn commit_subject(&self, revision: &str) -> Result<String>;
}

impl<T: RevisionHistory + ?Sized> RevisionHistory for &T {
    fn changed_files(&self, revision: &str) -> Result<Vec<PathBuf>> {
        (**self).changed_files(revision)
    }

    fn last_revision(&self) -> Result<String> {
        (**self).last_revision()
    }

    fn commit_subject(&self, revision: &str) -> Result<String> {
        (**self).commit_subject(revision)
    }
}

/// [`RevisionHistory`] backed by `git show` in a working directory.
#[derive(Debug, Clone)]
pub struct GitHistory {
    root: PathBuf,
}

impl GitHistory {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        let mut command = Command::new(GIT);
        command.args(args).current_dir(&self.root);
        run_bounded(command, GIT, GIT_TIMEOUT)?.into_success(GIT)
    }
}

impl RevisionHistory for GitHistory {
    fn changed_files(&self, revision: &str) -> Result<Vec<PathBuf>> {
        check_revision(revision)?;
        let out = self.git(&["show", "--pretty=format:", "--name-only", revision])?;
        Ok(parse_name_list(&out))
    }

    fn last_revision(&self) -> Result<String> {
        let out = self.git(&["show", "-s", "--format=%H", "HEAD"])?;
        first_line(&out)
            .map(str::to_string)
            .ok_or_else(|| LayerError::collaborator(GIT, "no commit hash in `git show` output"))
    }

    fn commit_subject(&self, revision: &str) -> Result<String> {
        check_revision(revision)?;
        let out = self.git(&["show", "-s", "--format=%s", revision])?;
        Ok(first_line(&out).unwrap_or_default().to_string())
    }
}

/// Rejects option-like revisions so they are never interpreted as `git` flags.
fn check_revision(revision: &str) -> Result<()> {
    if revision.is_empty() || revision.starts_with('-') {
        return Err(LayerError::collaborator(
            GIT,
            format!("invalid revision '{revision}'"),
        ));
    }
    Ok(())
}

/// One path per non-blank line.
#[must_use]
pub fn parse_name_list(output: &str) -> Vec<PathBuf> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn first_line(output: &str) -> Option<&str> {
    output.lines().map(str::trim).find(|l| !l.is_empty())
}
