// src/pipeline.rs
//! Orchestration of a layering analysis for one revision.
//!
//! Stages run strictly in order and any failure aborts the run:
//! `Idle → FilesSelected → DependenciesResolved → GraphBuilt → Classified → Scored`,
//! ending in `Reported`, or `Failed` when assertion mode meets a violation.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::collab::{CallGraphTool, Cflow, GitHistory, RevisionHistory};
use crate::config::Config;
use crate::error::{LayerError, Result};
use crate::graph::{calltree, DependencyResolver};
use crate::layers::{self, Classification, LayerDensity, LayerModel};
use crate::types::{Layer, LayerEdge, Violation, ViolationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Idle,
    FilesSelected,
    DependenciesResolved,
    GraphBuilt,
    Classified,
    Scored,
    Reported,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Index and per-layer breakdown for one violation kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KindScore {
    pub index: f64,
    pub layers: Vec<LayerDensity>,
}

/// Everything one run found.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub revision: String,
    pub subject: Option<String>,
    /// Changed files that have a layer.
    pub files: BTreeSet<PathBuf>,
    pub dependencies: BTreeSet<PathBuf>,
    /// Distinct file edges in the call tree, before layer filtering.
    pub raw_edges: usize,
    /// File edges with both endpoints layered.
    pub layered_edges: usize,
    pub layer_edges: BTreeSet<LayerEdge>,
    /// Analyzed files per layer.
    pub populations: BTreeMap<Layer, usize>,
    pub classification: Classification,
    pub back: KindScore,
    pub skip: KindScore,
}

impl AnalysisReport {
    #[must_use]
    pub fn has_violations(&self) -> bool {
        self.classification.has_violations()
    }

    #[must_use]
    pub fn violations(&self, kind: ViolationKind) -> &[Violation] {
        self.classification.of_kind(kind)
    }

    #[must_use]
    pub fn score(&self, kind: ViolationKind) -> &KindScore {
        match kind {
            ViolationKind::Back => &self.back,
            ViolationKind::Skip => &self.skip,
        }
    }

    /// Terminal stage once the report has been emitted.
    #[must_use]
    pub fn final_stage(&self, assert_mode: bool) -> Stage {
        if assert_mode && self.has_violations() {
            Stage::Failed
        } else {
            Stage::Reported
        }
    }
}

#[derive(Debug, Clone)]
pub enum Outcome {
    /// The revision touched no layered file.
    NothingToAnalyze { revision: String },
    Analyzed(Box<AnalysisReport>),
}

impl Outcome {
    #[must_use]
    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            Self::Analyzed(report) => Some(report),
            Self::NothingToAnalyze { .. } => None,
        }
    }
}

/// Runs the stages against a layer model and two collaborators.
pub struct Analyzer<H, G> {
    config: Config,
    model: LayerModel,
    history: H,
    graph: G,
}

impl Analyzer<GitHistory, Cflow> {
    /// Analyzer over `git` and `cflow`, with the layer model loaded from `config`.
    ///
    /// # Errors
    /// Returns `Configuration` if the layer model cannot be loaded.
    pub fn from_config(config: Config) -> Result<Self> {
        let model = LayerModel::load(&config.layers_path())?;
        info!("loaded {} layered files from {}", model.len(), config.layers_path().display());
        let history = GitHistory::new(&config.root);
        let graph = Cflow::new(&config.root, config.graph.clone());
        Ok(Self::new(config, model, history, graph))
    }
}

impl<H: RevisionHistory, G: CallGraphTool> Analyzer<H, G> {
    #[must_use]
    pub fn new(config: Config, model: LayerModel, history: H, graph: G) -> Self {
        Self {
            config,
            model,
            history,
            graph,
        }
    }

    #[must_use]
    pub fn model(&self) -> &LayerModel {
        &self.model
    }

    /// Analyzes `revision`, or the latest revision when `None`.
    ///
    /// # Errors
    /// Propagates the first collaborator, I/O, or lookup failure. No partial report
    /// is produced.
    pub fn run(&self, revision: Option<&str>) -> Result<Outcome> {
        enter(Stage::Idle);
        let revision = match revision {
            Some(rev) => rev.to_string(),
            None => self.history.last_revision()?,
        };

        let changed = self.history.changed_files(&revision)?;
        let files = self.model.restrict(&changed);
        if files.is_empty() {
            info!("{revision} touches none of the {} layered files", self.model.len());
            return Ok(Outcome::NothingToAnalyze { revision });
        }
        enter(Stage::FilesSelected);
        debug!("{} of {} changed files are layered", files.len(), changed.len());

        let resolver = DependencyResolver::new(&self.config.root, self.config.resolver.clone());
        let dependencies = resolver.resolve(&files)?;
        enter(Stage::DependenciesResolved);

        let inputs = self.graph_inputs(&files, &dependencies)?;
        let tree = self.graph.call_tree(&inputs)?;
        let raw = calltree::parse(tree.lines());
        let edges = layers::retain_layered(&raw, &self.model);
        let layer_edges = layers::map_edges(&edges, |p| self.model.layer_of(p));
        enter(Stage::GraphBuilt);
        debug!("{} call edges, {} within the layer model", raw.len(), edges.len());

        let classification = layers::classify(&edges, &self.model)?;
        enter(Stage::Classified);

        let analyzed = inputs
            .iter()
            .chain(edges.iter().flat_map(|e| [&e.caller, &e.callee]))
            .filter(|p| self.exists(p));
        let populations = self.model.sizes(analyzed);
        let back = kind_score(&classification.back_calls, &populations)?;
        let skip = kind_score(&classification.skip_calls, &populations)?;
        enter(Stage::Scored);

        let subject = match self.history.commit_subject(&revision) {
            Ok(s) if !s.is_empty() => Some(s),
            Ok(_) => None,
            Err(e) => {
                warn!("could not read subject of {revision}: {e}");
                None
            }
        };

        Ok(Outcome::Analyzed(Box::new(AnalysisReport {
            revision,
            subject,
            files,
            raw_edges: raw.len(),
            layered_edges: edges.len(),
            dependencies,
            layer_edges,
            populations,
            classification,
            back,
            skip,
        })))
    }

    /// Changed files and dependency candidates that exist under the root.
    ///
    /// A changed file the revision deleted is left out. In strict mode it is an error.
    fn graph_inputs(
        &self,
        files: &BTreeSet<PathBuf>,
        dependencies: &BTreeSet<PathBuf>,
    ) -> Result<BTreeSet<PathBuf>> {
        let mut inputs = BTreeSet::new();
        for file in files {
            if self.exists(file) {
                inputs.insert(file.clone());
            } else if self.config.resolver.strict {
                return Err(LayerError::MissingFile { path: file.clone() });
            } else {
                warn!("changed file {} not found, leaving it out of the call graph", file.display());
            }
        }
        for dep in dependencies {
            if self.exists(dep) {
                inputs.insert(dep.clone());
            } else {
                warn!("dependency {} not found, leaving it out of the call graph", dep.display());
            }
        }
        Ok(inputs)
    }

    fn exists(&self, path: &Path) -> bool {
        self.config.root.join(path).is_file()
    }
}

fn kind_score(flagged: &[Violation], populations: &BTreeMap<Layer, usize>) -> Result<KindScore> {
    let per_layer = layers::densities(&layers::count_by_layer(flagged), populations)?;
    Ok(KindScore {
        index: layers::scoring::mean(&per_layer),
        layers: per_layer,
    })
}

fn enter(stage: Stage) {
    debug!(%stage, "pipeline stage");
}
