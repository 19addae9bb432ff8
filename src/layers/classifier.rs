// src/layers/classifier.rs
//! Back-call and skip-call detection.

use serde::Serialize;

use super::model::LayerModel;
use crate::error::{LayerError, Result};
use crate::types::{CallEdge, Layer, Violation, ViolationKind};

/// Partition of a layered edge set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classification {
    pub back_calls: Vec<Violation>,
    pub skip_calls: Vec<Violation>,
    pub compliant: usize,
}

impl Classification {
    #[must_use]
    pub fn has_violations(&self) -> bool {
        !self.back_calls.is_empty() || !self.skip_calls.is_empty()
    }

    #[must_use]
    pub fn total_violations(&self) -> usize {
        self.back_calls.len() + self.skip_calls.len()
    }

    #[must_use]
    pub fn of_kind(&self, kind: ViolationKind) -> &[Violation] {
        match kind {
            ViolationKind::Back => &self.back_calls,
            ViolationKind::Skip => &self.skip_calls,
        }
    }
}

/// Verdict for a single caller/callee layer pair. `None` means compliant.
#[must_use]
pub fn classify_layers(caller: Layer, callee: Layer) -> Option<ViolationKind> {
    if caller < callee {
        return Some(ViolationKind::Back);
    }
    if caller - callee > 1 {
        return Some(ViolationKind::Skip);
    }
    None
}

/// Classifies every file-level edge. Duplicate layer pairs are kept per file edge.
///
/// # Errors
/// Returns `Lookup` if an endpoint has no layer. Callers filter through
/// [`retain_layered`](super::mapper::retain_layered) first.
pub fn classify<'a, I>(edges: I, model: &LayerModel) -> Result<Classification>
where
    I: IntoIterator<Item = &'a CallEdge>,
{
    let mut result = Classification::default();

    for edge in edges {
        let caller_layer = lookup(model, &edge.caller)?;
        let callee_layer = lookup(model, &edge.callee)?;

        let Some(kind) = classify_layers(caller_layer, callee_layer) else {
            result.compliant += 1;
            continue;
        };

        let violation = Violation {
            kind,
            edge: edge.clone(),
            caller_layer,
            callee_layer,
        };
        match kind {
            ViolationKind::Back => result.back_calls.push(violation),
            ViolationKind::Skip => result.skip_calls.push(violation),
        }
    }

    Ok(result)
}

fn lookup(model: &LayerModel, path: &std::path::Path) -> Result<Layer> {
    model.layer_of(path).ok_or_else(|| LayerError::Lookup {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Edge;
    use std::path::PathBuf;

    fn edge(from: &str, to: &str) -> CallEdge {
        Edge::new(PathBuf::from(from), PathBuf::from(to))
    }

    #[test]
    fn layer_pairs_are_classified() {
        assert_eq!(classify_layers(0, 1), Some(ViolationKind::Back));
        assert_eq!(classify_layers(0, 2), Some(ViolationKind::Back));
        assert_eq!(classify_layers(1, 1), None);
        assert_eq!(classify_layers(2, 1), None);
        assert_eq!(classify_layers(2, 0), Some(ViolationKind::Skip));
        assert_eq!(classify_layers(7, 3), Some(ViolationKind::Skip));
    }

    #[test]
    fn back_call_against_a_lower_caller() {
        let model: LayerModel = [("a.c", 0), ("b.c", 1), ("c.c", 2)].into_iter().collect();
        let edges = [edge("a.c", "b.c"), edge("b.c", "a.c")];
        let result = classify(&edges, &model).unwrap();

        assert_eq!(result.back_calls.len(), 1);
        assert_eq!(result.back_calls[0].edge, edge("a.c", "b.c"));
        assert!(result.skip_calls.is_empty());
        assert_eq!(result.compliant, 1);
    }

    #[test]
    fn skip_call_records_both_layers() {
        let model: LayerModel = [("a.c", 2), ("b.c", 0)].into_iter().collect();
        let result = classify(&[edge("a.c", "b.c")], &model).unwrap();

        assert!(result.back_calls.is_empty());
        assert_eq!(result.skip_calls.len(), 1);
        let v = &result.skip_calls[0];
        assert_eq!((v.caller_layer, v.callee_layer), (2, 0));
        assert_eq!(v.kind, ViolationKind::Skip);
    }

    #[test]
    fn every_edge_lands_in_exactly_one_bucket() {
        let model: LayerModel = (0..6u32).map(|l| (format!("l{l}.c"), l)).collect();
        let edges: Vec<CallEdge> = (0..6u32)
            .flat_map(|a| (0..6u32).map(move |b| edge(&format!("l{a}.c"), &format!("l{b}.c"))))
            .collect();

        let result = classify(&edges, &model).unwrap();
        assert_eq!(result.total_violations() + result.compliant, edges.len());
        for v in &result.back_calls {
            assert!(!result.skip_calls.contains(v));
        }
    }

    #[test]
    fn edges_sharing_a_layer_pair_are_each_flagged() {
        let model: LayerModel = [("a.c", 0), ("b.c", 0), ("x.c", 3)].into_iter().collect();
        let edges = [edge("a.c", "x.c"), edge("b.c", "x.c")];
        assert_eq!(classify(&edges, &model).unwrap().back_calls.len(), 2);
    }

    #[test]
    fn unlayered_endpoint_is_a_lookup_failure() {
        let model: LayerModel = [("a.c", 0)].into_iter().collect();
        let err = classify(&[edge("a.c", "stdio.h")], &model).unwrap_err();
        assert!(matches!(err, LayerError::Lookup { ref path } if path == &PathBuf::from("stdio.h")));
    }
}
