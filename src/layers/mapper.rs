// src/layers/mapper.rs
//! Projection of file-level edges onto the layer space.

use std::collections::BTreeSet;

use super::model::LayerModel;
use crate::types::{CallEdge, Edge, Layer, LayerEdge};

/// Projects every edge whose endpoints both have a layer; all others are dropped.
///
/// Several file edges may collapse onto one layer edge.
pub fn map_edges<'a, N, I, F>(edges: I, layer_of: F) -> BTreeSet<LayerEdge>
where
    N: 'a,
    I: IntoIterator<Item = &'a Edge<N>>,
    F: Fn(&N) -> Option<Layer>,
{
    edges
        .into_iter()
        .filter_map(|e| Some(Edge::new(layer_of(&e.caller)?, layer_of(&e.callee)?)))
        .collect()
}

/// File-level edges whose endpoints are both in the model.
///
/// Out-of-model files (system headers, vendored code) are out of scope.
pub fn retain_layered<'a, I>(edges: I, model: &LayerModel) -> BTreeSet<CallEdge>
where
    I: IntoIterator<Item = &'a CallEdge>,
{
    edges
        .into_iter()
        .filter(|e| model.contains(&e.caller) && model.contains(&e.callee))
        .cloned()
        .collect()
}
