// src/collab/cflow.rs
//! Call-graph generation through GNU cflow.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use super::process::run_bounded;
use crate::config::GraphConfig;
use crate::error::Result;

/// Producer of indentation-structured call-tree reports.
pub trait CallGraphTool {
    /// Call tree covering `files`, in the layout read by
    /// [`graph::calltree::parse`](crate::graph::calltree::parse).
    ///
    /// # Errors
    /// Returns `Collaborator` if the tool fails and `Timeout` if it runs too long.
    fn call_tree(&self, files: &BTreeSet<PathBuf>) -> Result<String>;
}

impl<T: CallGraphTool + ?Sized> CallGraphTool for &T {
    fn call_tree(&self, files: &BTreeSet<PathBuf>) -> Result<String> {
        (**self).call_tree(files)
    }
}

/// [`CallGraphTool`] that shells out to `cflow` (or a compatible program).
#[derive(Debug, Clone)]
pub struct Cflow {
    root: PathBuf,
    config: GraphConfig,
}

impl Cflow {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, config: GraphConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Arguments for one invocation: extra args, depth, then the files.
    #[must_use]
    pub fn arguments(&self, files: &BTreeSet<PathBuf>) -> Vec<String> {
        let mut args = self.config.extra_args.clone();
        args.push("-d".to_string());
        args.push(self.config.depth.to_string());
        args.extend(files.iter().map(|f| f.to_string_lossy().into_owned()));
        args
    }
}

impl CallGraphTool for Cflow {
    fn call_tree(&self, files: &BTreeSet<PathBuf>) -> Result<String> {
        if files.is_empty() {
            return Ok(String::new());
        }
        let tool = self.config.program.as_str();
        let mut command = Command::new(tool);
        command.args(self.arguments(files)).current_dir(&self.root);
        run_bounded(command, tool, Duration::from_secs(self.config.timeout_secs))?
            .into_success(tool)
    }
}
