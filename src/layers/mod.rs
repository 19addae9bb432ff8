// src/layers/mod.rs
//! Layer model and the layering checks built on it.
//!
//! Edges are projected onto integer layers, classified as back or skip calls,
//! and the flagged calls are scored into per-kind violation indices.

pub mod classifier;
pub mod mapper;
pub mod model;
pub mod scoring;

pub use classifier::{classify, classify_layers, Classification};
pub use mapper::{map_edges, retain_layered};
pub use model::LayerModel;
pub use scoring::{count_by_layer, densities, score, LayerDensity};
