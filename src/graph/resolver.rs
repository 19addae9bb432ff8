// src/graph/resolver.rs
//! Dependency resolution from quoted include directives.
//!
//! Direct includes of each input file are mapped to their source-style counterparts.
//! With recursion enabled, the header-style counterparts are then expanded breadth-first:
//! every dequeued header is scanned for its own includes, and each header path is
//! queued at most once, so the walk is bounded by the number of distinct headers.

use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::includes;
use crate::config::ResolverConfig;
use crate::error::{LayerError, Result};

/// Resolves the include closure of a file set, relative to an analysis root.
#[derive(Debug, Clone)]
pub struct DependencyResolver {
    root: PathBuf,
    config: ResolverConfig,
}

impl DependencyResolver {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, config: ResolverConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    #[must_use]
    pub fn is_recursive(&self) -> bool {
        self.config.recursive
    }

    /// Computes the dependency set of `files`.
    ///
    /// Candidates are added without checking that they exist on disk.
    ///
    /// # Errors
    /// Returns `MissingFile` in strict mode when a scanned file does not exist,
    /// and `Io` when an existing file cannot be read.
    pub fn resolve(&self, files: &BTreeSet<PathBuf>) -> Result<BTreeSet<PathBuf>> {
        let scans: Vec<Result<Vec<PathBuf>>> =
            files.par_iter().map(|file| self.scan(file)).collect();

        let mut dependencies = BTreeSet::new();
        for scan in scans {
            for header in scan? {
                dependencies.insert(self.to_source(&header));
            }
        }
        debug!("{} direct dependencies from {} files", dependencies.len(), files.len());

        if self.config.recursive {
            self.expand(&mut dependencies)?;
        }
        Ok(dependencies)
    }

    /// Breadth-first expansion through header files.
    fn expand(&self, dependencies: &mut BTreeSet<PathBuf>) -> Result<()> {
        let mut queue: VecDeque<PathBuf> = VecDeque::new();
        let mut visited: HashSet<PathBuf> = HashSet::new();

        for dep in dependencies.iter() {
            let header = self.to_header(dep);
            if visited.insert(header.clone()) {
                queue.push_back(header);
            }
        }

        while let Some(current) = queue.pop_front() {
            for child in self.scan(&current)? {
                if visited.insert(child.clone()) {
                    queue.push_back(child);
                }
            }
            dependencies.insert(current);
        }

        debug!("{} dependencies after transitive expansion", dependencies.len());
        Ok(())
    }

    /// Include targets of one file, as paths relative to the root.
    fn scan(&self, file: &Path) -> Result<Vec<PathBuf>> {
        let Some(content) = self.read(file)? else {
            return Ok(Vec::new());
        };
        Ok(includes::include_targets(&content)
            .into_iter()
            .map(|target| includes::sibling_path(file, target))
            .collect())
    }

    fn read(&self, file: &Path) -> Result<Option<String>> {
        let full = self.root.join(file);
        match fs::read(&full) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if self.config.strict {
                    return Err(LayerError::MissingFile {
                        path: file.to_path_buf(),
                    });
                }
                warn!("skipping missing file {}", file.display());
                Ok(None)
            }
            Err(source) => Err(LayerError::Io { source, path: full }),
        }
    }

    fn to_source(&self, path: &Path) -> PathBuf {
        includes::swap_extension(path, &self.config.header_ext, &self.config.source_ext)
    }

    fn to_header(&self, path: &Path) -> PathBuf {
        includes::swap_extension(path, &self.config.source_ext, &self.config.header_ext)
    }
}
