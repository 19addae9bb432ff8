// src/config/mod.rs
//! Run configuration: analysis root, layer model location, resolver and graph tool settings.
//!
//! Values come from defaults, then `layerguard.toml`, then command-line overrides applied
//! by the binary. Nothing here touches process-global state; the root is carried explicitly.

pub mod types;

pub use self::types::{GraphConfig, LayerGuardToml, LayersSection, ReportFormat, ResolverConfig};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{LayerError, Result};

pub const CONFIG_FILE: &str = "layerguard.toml";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory every relative path is resolved against.
    pub root: PathBuf,
    pub layers_file: PathBuf,
    pub resolver: ResolverConfig,
    pub graph: GraphConfig,
}

impl Config {
    /// Defaults rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_toml(root.into(), LayerGuardToml::default())
    }

    /// Loads settings for `root`.
    ///
    /// An explicit settings file must exist. Without one, `<root>/layerguard.toml`
    /// is read when present and defaults are used otherwise.
    ///
    /// # Errors
    /// Returns `Configuration` if the file is unreadable, malformed, or invalid.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => root.join(p),
            None => {
                let candidate = root.join(CONFIG_FILE);
                if !candidate.is_file() {
                    debug!("no {CONFIG_FILE} under {}, using defaults", root.display());
                    return Ok(Self::new(root));
                }
                candidate
            }
        };

        let content =
            fs::read_to_string(&path).map_err(|e| LayerError::configuration(&path, e))?;
        let config = Self::parse_toml(root, &path, &content)?;
        debug!("loaded settings from {}", path.display());
        Ok(config)
    }

    /// Parses TOML settings. `origin` is only used in error messages.
    ///
    /// # Errors
    /// Returns `Configuration` on malformed TOML or invalid values.
    pub fn parse_toml(root: &Path, origin: &Path, content: &str) -> Result<Self> {
        let parsed: LayerGuardToml =
            toml::from_str(content).map_err(|e| LayerError::configuration(origin, e))?;
        let config = Self::from_toml(root.to_path_buf(), parsed);
        config.validate(origin)?;
        Ok(config)
    }

    fn from_toml(root: PathBuf, file: LayerGuardToml) -> Self {
        Self {
            root,
            layers_file: file.layers.file,
            resolver: file.resolver,
            graph: file.graph,
        }
    }

    /// Checks value ranges that serde cannot express.
    ///
    /// # Errors
    /// Returns `Configuration` naming `origin` on the first invalid value.
    pub fn validate(&self, origin: &Path) -> Result<()> {
        if self.graph.program.trim().is_empty() {
            return Err(LayerError::configuration(origin, "graph.program is empty"));
        }
        if self.graph.depth == 0 {
            return Err(LayerError::configuration(origin, "graph.depth must be at least 1"));
        }
        if self.graph.timeout_secs == 0 {
            return Err(LayerError::configuration(origin, "graph.timeout_secs must be positive"));
        }
        let (header, source) = (&self.resolver.header_ext, &self.resolver.source_ext);
        if header.is_empty() || source.is_empty() || header == source {
            return Err(LayerError::configuration(
                origin,
                "resolver.header_ext and resolver.source_ext must be distinct and non-empty",
            ));
        }
        Ok(())
    }

    /// Absolute (or root-relative) location of the layer model.
    #[must_use]
    pub fn layers_path(&self) -> PathBuf {
        self.root.join(&self.layers_file)
    }
}
