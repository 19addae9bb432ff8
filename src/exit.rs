// src/exit.rs
//! Standardized process exit codes for `layerguard`.
//!
//! Provides a stable contract for CI gates and scripts.

use std::process::Termination;

use crate::error::LayerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum LayerGuardExit {
    /// Analysis completed (or there was nothing to analyze).
    Success = 0,
    /// Generic error (I/O, internal lookup failures).
    Error = 1,
    /// Layer model or settings file unreadable or malformed.
    ConfigError = 2,
    /// `git` or the graph tool failed, misbehaved, or timed out.
    ToolFailure = 3,
    /// Assertion mode found back calls or skip calls.
    ViolationsFound = 4,
}

impl LayerGuardExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Exit status for a finished analysis.
    #[must_use]
    pub fn for_outcome(has_violations: bool, assert_mode: bool) -> Self {
        if assert_mode && has_violations {
            Self::ViolationsFound
        } else {
            Self::Success
        }
    }
}

impl From<&LayerError> for LayerGuardExit {
    fn from(err: &LayerError) -> Self {
        match err {
            LayerError::Configuration { .. } => Self::ConfigError,
            LayerError::Collaborator { .. } | LayerError::Timeout { .. } => Self::ToolFailure,
            LayerError::Lookup { .. }
            | LayerError::EmptyLayer { .. }
            | LayerError::MissingFile { .. }
            | LayerError::Io { .. } => Self::Error,
        }
    }
}

impl From<&anyhow::Error> for LayerGuardExit {
    fn from(err: &anyhow::Error) -> Self {
        err.downcast_ref::<LayerError>()
            .map_or(Self::Error, Self::from)
    }
}

impl Termination for LayerGuardExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}
