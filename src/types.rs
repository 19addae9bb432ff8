// src/types.rs
//! Core data model shared by every stage of the layering analysis.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Position of a file in the architectural ordering. Lower is more foundational.
pub type Layer = u32;

/// Directed dependency: `caller` references code in `callee`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Edge<N> {
    pub caller: N,
    pub callee: N,
}

impl<N> Edge<N> {
    #[must_use]
    pub fn new(caller: N, callee: N) -> Self {
        Self { caller, callee }
    }
}

/// File-level call edge produced by the call-tree parser.
pub type CallEdge = Edge<PathBuf>;

/// Call edge projected onto the layer space.
pub type LayerEdge = Edge<Layer>;

impl fmt::Display for CallEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.caller.display(), self.callee.display())
    }
}

/// Categories of layering violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Caller sits below its callee: the dependency flows upwards.
    Back,
    /// Caller jumps over one or more intermediate layers.
    Skip,
}

impl ViolationKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Back => "BACK_CALL",
            Self::Skip => "SKIP_CALL",
        }
    }

    /// Short name of the aggregate index for this kind.
    #[must_use]
    pub fn index_name(self) -> &'static str {
        match self {
            Self::Back => "BCVI",
            Self::Skip => "SCVI",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Back => "Lower layer calls into a higher layer",
            Self::Skip => "Call bypasses intermediate layers",
        }
    }
}

/// A flagged call together with the layers that made it a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub edge: CallEdge,
    pub caller_layer: Layer,
    pub callee_layer: Layer,
}

impl Violation {
    /// Human-readable remediation hint.
    #[must_use]
    pub fn suggestion(&self) -> String {
        match self.kind {
            ViolationKind::Back => format!(
                "Move the called code of '{}' down to layer {} or below, or invert the dependency.",
                self.edge.callee.display(),
                self.caller_layer
            ),
            ViolationKind::Skip => format!(
                "Route the call through layer {} instead of reaching layer {} directly.",
                self.caller_layer - 1,
                self.callee_layer
            ),
        }
    }
}
