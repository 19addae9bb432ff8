// src/layers/model.rs
//! The user-supplied file → layer assignment.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LayerError, Result};
use crate::graph::includes::normalize;
use crate::types::Layer;

/// Immutable mapping from file path to layer number.
///
/// Keys are normalized lexically on load, so `./src/a.c` and `src/a.c` name the same file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerModel {
    layers: BTreeMap<PathBuf, Layer>,
}

impl LayerModel {
    /// Reads a JSON layer definition file.
    ///
    /// # Errors
    /// Returns `Configuration` if the file is unreadable or not a map of
    /// paths to non-negative integers.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| LayerError::configuration(path, e))?;
        Self::from_json(path, &content)
    }

    /// Parses JSON content. `origin` is only used in error messages.
    ///
    /// # Errors
    /// Returns `Configuration` on malformed JSON, negative or fractional layers,
    /// or two spellings of one path assigned different layers.
    pub fn from_json(origin: &Path, content: &str) -> Result<Self> {
        let raw: BTreeMap<String, Layer> =
            serde_json::from_str(content).map_err(|e| LayerError::configuration(origin, e))?;

        let mut layers = BTreeMap::new();
        for (key, layer) in raw {
            let path = normalize(Path::new(&key));
            match layers.entry(path) {
                Entry::Vacant(slot) => {
                    slot.insert(layer);
                }
                Entry::Occupied(existing) if *existing.get() != layer => {
                    return Err(LayerError::configuration(
                        origin,
                        format!(
                            "'{key}' is assigned layer {layer} but also layer {}",
                            existing.get()
                        ),
                    ));
                }
                Entry::Occupied(_) => {}
            }
        }
        Ok(Self { layers })
    }

    #[must_use]
    pub fn layer_of(&self, path: &Path) -> Option<Layer> {
        self.layers.get(path).copied()
    }

    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.layers.contains_key(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, Layer)> {
        self.layers.iter().map(|(p, l)| (p.as_path(), *l))
    }

    /// Members of `files` that have a layer.
    pub fn restrict<'a, I>(&self, files: I) -> BTreeSet<PathBuf>
    where
        I: IntoIterator<Item = &'a PathBuf>,
    {
        files
            .into_iter()
            .map(|f| normalize(f))
            .filter(|f| self.contains(f))
            .collect()
    }

    /// Number of distinct layered files per layer among `files`. Unlayered files are ignored.
    pub fn sizes<'a, I>(&self, files: I) -> BTreeMap<Layer, usize>
    where
        I: IntoIterator<Item = &'a PathBuf>,
    {
        let unique: BTreeSet<&PathBuf> = files.into_iter().collect();
        let mut sizes = BTreeMap::new();
        for file in unique {
            if let Some(layer) = self.layer_of(file) {
                *sizes.entry(layer).or_insert(0) += 1;
            }
        }
        sizes
    }
}

impl<P: Into<PathBuf>> FromIterator<(P, Layer)> for LayerModel {
    fn from_iter<T: IntoIterator<Item = (P, Layer)>>(iter: T) -> Self {
        let layers = iter
            .into_iter()
            .map(|(p, l)| {
                let path: PathBuf = p.into();
                (normalize(&path), l)
            })
            .collect();
        Self { layers }
    }
}
