// src/cli/args.rs
use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, ReportFormat};
use crate::error::Result;

#[derive(Debug, Parser)]
#[command(
    name = "layerguard",
    version,
    about = "Detect back calls and skip calls introduced by a commit"
)]
pub struct Cli {
    /// Revision to analyze (defaults to the latest commit)
    #[arg(short = 'c', long = "commit", value_name = "REV")]
    pub commit: Option<String>,

    /// Layer definitions file (JSON map of file path to layer number)
    #[arg(short = 'l', long = "layers", value_name = "FILE")]
    pub layers: Option<PathBuf>,

    /// Exit non-zero when any back call or skip call is found (for CI)
    #[arg(long = "assert")]
    pub assert_mode: bool,

    /// Directory to analyze from; all relative paths resolve against it
    #[arg(long, env = "LAYERGUARD_PATH", default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// Settings file (defaults to <root>/layerguard.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Only scan direct includes of the changed files
    #[arg(long)]
    pub no_recursive: bool,

    /// Fail when a scanned file does not exist
    #[arg(long)]
    pub strict: bool,

    /// Seconds to wait for the call-graph tool
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    /// Settings file values with command-line overrides applied.
    ///
    /// # Errors
    /// Returns `Configuration` if the settings file is unreadable or invalid,
    /// or an override is out of range.
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config::load(&self.root, self.config.as_deref())?;
        if let Some(layers) = &self.layers {
            config.layers_file.clone_from(layers);
        }
        if self.no_recursive {
            config.resolver.recursive = false;
        }
        if self.strict {
            config.resolver.strict = true;
        }
        if let Some(secs) = self.timeout {
            config.graph.timeout_secs = secs;
        }
        config.validate(std::path::Path::new("command line"))?;
        Ok(config)
    }
}
