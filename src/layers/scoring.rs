// src/layers/scoring.rs
//! Violation indices (BCVI / SCVI).
//!
//! For every layer that owns at least one flagged call, the density is
//! `flagged calls / analyzed files in that layer`. The index is the mean density
//! over those layers only; compliant layers neither add a term nor widen the divisor.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{LayerError, Result};
use crate::types::{Layer, Violation};

/// Flagged-call density of one layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerDensity {
    pub layer: Layer,
    pub flagged: usize,
    pub population: usize,
    pub density: f64,
}

/// Flagged calls per caller layer. Every record counts, including repeats.
#[must_use]
pub fn count_by_layer(flagged: &[Violation]) -> BTreeMap<Layer, usize> {
    let mut counts = BTreeMap::new();
    for v in flagged {
        *counts.entry(v.caller_layer).or_insert(0) += 1;
    }
    counts
}

/// Per-layer densities, ordered by layer.
///
/// # Errors
/// Returns `EmptyLayer` if a layer with flagged calls has no population in `sizes`.
#[allow(clippy::implicit_hasher)]
pub fn densities(
    counts: &BTreeMap<Layer, usize>,
    sizes: &BTreeMap<Layer, usize>,
) -> Result<Vec<LayerDensity>> {
    counts
        .iter()
        .map(|(&layer, &flagged)| {
            let population = sizes.get(&layer).copied().unwrap_or(0);
            if population == 0 {
                return Err(LayerError::EmptyLayer { layer });
            }
            #[allow(clippy::cast_precision_loss)]
            let density = flagged as f64 / population as f64;
            Ok(LayerDensity {
                layer,
                flagged,
                population,
                density,
            })
        })
        .collect()
}

/// Mean density across violating layers; `0.0` when nothing is flagged.
///
/// # Errors
/// Returns `EmptyLayer` if a flagged caller layer has no analyzed files.
pub fn score(flagged: &[Violation], sizes: &BTreeMap<Layer, usize>) -> Result<f64> {
    let per_layer = densities(&count_by_layer(flagged), sizes)?;
    Ok(mean(&per_layer))
}

/// Mean of precomputed densities; `0.0` for an empty slice.
#[must_use]
pub fn mean(per_layer: &[LayerDensity]) -> f64 {
    if per_layer.is_empty() {
        return 0.0;
    }
    let total: f64 = per_layer.iter().map(|d| d.density).sum();
    #[allow(clippy::cast_precision_loss)]
    let count = per_layer.len() as f64;
    total / count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, ViolationKind};
    use std::path::PathBuf;

    fn back(from: &str, caller_layer: Layer) -> Violation {
        Violation {
            kind: ViolationKind::Back,
            edge: Edge::new(PathBuf::from(from), PathBuf::from("top.c")),
            caller_layer,
            callee_layer: caller_layer + 1,
        }
    }

    fn sizes(pairs: &[(Layer, usize)]) -> BTreeMap<Layer, usize> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn nothing_flagged_scores_zero() {
        assert_eq!(score(&[], &sizes(&[(0, 3)])).unwrap(), 0.0);
    }

    #[test]
    fn counts_are_keyed_by_caller_layer() {
        let flagged = [back("a.c", 0), back("b.c", 0), back("c.c", 1)];
        let counts = count_by_layer(&flagged);
        assert_eq!(counts.get(&0), Some(&2));
        assert_eq!(counts.get(&1), Some(&1));
    }

    #[test]
    fn index_is_mean_over_violating_layers_only() {
        // layer 0: 2 flagged / 4 files = 0.5, layer 1: 1 / 1 = 1.0, layer 2 compliant
        let flagged = [back("a.c", 0), back("b.c", 0), back("c.c", 1)];
        let value = score(&flagged, &sizes(&[(0, 4), (1, 1), (2, 10)])).unwrap();
        assert!((value - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn adding_compliant_layers_does_not_dilute() {
        let flagged = [back("a.c", 0)];
        let small = score(&flagged, &sizes(&[(0, 2)])).unwrap();
        let large = score(&flagged, &sizes(&[(0, 2), (1, 5), (2, 9)])).unwrap();
        assert!((small - large).abs() < f64::EPSILON);
    }

    #[test]
    fn ordering_does_not_change_the_index() {
        let mut flagged = vec![back("a.c", 0), back("b.c", 2), back("c.c", 1), back("d.c", 2)];
        let layer_sizes = sizes(&[(0, 3), (1, 2), (2, 5)]);
        let forward = score(&flagged, &layer_sizes).unwrap();
        flagged.reverse();
        let backward = score(&flagged, &layer_sizes).unwrap();
        assert!((forward - backward).abs() < f64::EPSILON);
    }

    #[test]
    fn index_is_bounded_by_largest_count() {
        let flagged = [back("a.c", 0), back("a.c", 0), back("a.c", 0), back("b.c", 1)];
        let value = score(&flagged, &sizes(&[(0, 1), (1, 1)])).unwrap();
        let max_count = *count_by_layer(&flagged).values().max().unwrap();
        assert!(value >= 0.0);
        #[allow(clippy::cast_precision_loss)]
        let bound = max_count as f64;
        assert!(value <= bound);
    }

    #[test]
    fn missing_population_is_an_error() {
        let err = score(&[back("a.c", 3)], &sizes(&[(0, 1)])).unwrap_err();
        assert!(matches!(err, LayerError::EmptyLayer { layer: 3 }));
    }

    #[test]
    fn densities_report_each_layer() {
        let flagged = [back("a.c", 0), back("b.c", 1), back("c.c", 1)];
        let per_layer = densities(&count_by_layer(&flagged), &sizes(&[(0, 2), (1, 4)])).unwrap();
        assert_eq!(per_layer.len(), 2);
        assert_eq!(per_layer[1].flagged, 2);
        assert!((per_layer[0].density - 0.5).abs() < f64::EPSILON);
    }
}
