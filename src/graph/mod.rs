// src/graph/mod.rs
//! File-level dependency discovery: include scanning, transitive resolution,
//! and parsing of the external call-tree report.

pub mod calltree;
pub mod includes;
pub mod resolver;

pub use calltree::parse as parse_call_tree;
pub use resolver::DependencyResolver;
