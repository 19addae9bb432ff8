// src/collab/mod.rs
//! External collaborators: revision history (`git`) and call-graph generation (`cflow`).
//!
//! Both sit behind traits so the pipeline can be driven by fakes in tests.

pub mod cflow;
pub mod history;
pub mod process;

pub use cflow::{CallGraphTool, Cflow};
pub use history::{GitHistory, RevisionHistory};
