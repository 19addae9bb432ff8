// src/config/types.rs
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// On-disk shape of `layerguard.toml`. Every section and key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayerGuardToml {
    pub layers: LayersSection,
    pub resolver: ResolverConfig,
    pub graph: GraphConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayersSection {
    /// Layer model file, relative to the analysis root.
    pub file: PathBuf,
}

impl Default for LayersSection {
    fn default() -> Self {
        Self { file: default_layers_file() }
    }
}

/// Include-scanning settings for the dependency resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Follow includes transitively through headers.
    pub recursive: bool,
    /// Fail on files that cannot be read instead of skipping them.
    pub strict: bool,
    /// Extension of header-style references (without the dot).
    pub header_ext: String,
    /// Extension of the matching source files (without the dot).
    pub source_ext: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            strict: false,
            header_ext: "h".to_string(),
            source_ext: "c".to_string(),
        }
    }
}

/// External call-graph tool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    pub program: String,
    /// Call-tree depth passed to the tool. Callers plus direct callees is 2.
    pub depth: u32,
    pub timeout_secs: u64,
    /// Extra arguments placed before the file list.
    pub extra_args: Vec<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            program: "cflow".to_string(),
            depth: 2,
            timeout_secs: 120,
            extra_args: Vec::new(),
        }
    }
}

/// Report rendering selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

fn default_layers_file() -> PathBuf {
    PathBuf::from("layers.json")
}
