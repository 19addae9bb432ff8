// src/lib.rs
//! Layering-violation analysis for C code bases.
//!
//! A revision's changed files are expanded through their quoted includes, a call tree is
//! generated for them, and every call edge between layered files is checked against the
//! user's file → layer assignment. Calls that climb to a higher layer are back calls;
//! calls that jump over intermediate layers are skip calls.

pub mod cli;
pub mod collab;
pub mod config;
pub mod error;
pub mod exit;
pub mod graph;
pub mod layers;
pub mod pipeline;
pub mod reporting;
pub mod types;

pub use error::{LayerError, Result};
pub use pipeline::{AnalysisReport, Analyzer, Outcome, Stage};
