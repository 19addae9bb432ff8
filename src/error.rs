// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

use crate::types::Layer;

#[derive(Debug, Error)]
pub enum LayerError {
    #[error("Configuration error in {path}: {reason}")]
    Configuration { path: PathBuf, reason: String },

    #[error("{tool} failed: {reason}")]
    Collaborator { tool: String, reason: String },

    #[error("{tool} timed out after {seconds}s")]
    Timeout { tool: String, seconds: u64 },

    /// An edge endpoint without a layer reached a stage that requires one.
    #[error("No layer assigned to {path} (edges must be filtered through the layer model first)")]
    Lookup { path: PathBuf },

    /// A flagged caller layer has no analyzed files to normalize against.
    #[error("Layer {layer} has flagged calls but no analyzed files")]
    EmptyLayer { layer: Layer },

    #[error("Missing file: {path}")]
    MissingFile { path: PathBuf },

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
}

impl LayerError {
    pub(crate) fn collaborator(tool: &str, reason: impl Into<String>) -> Self {
        Self::Collaborator {
            tool: tool.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Configuration {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LayerError>;
