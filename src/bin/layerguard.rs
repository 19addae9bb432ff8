// src/bin/layerguard.rs
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use layerguard_core::cli::Cli;
use layerguard_core::config::ReportFormat;
use layerguard_core::exit::LayerGuardExit;
use layerguard_core::reporting;
use layerguard_core::{Analyzer, Outcome, Stage};

fn main() -> LayerGuardExit {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            LayerGuardExit::from(&e)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> Result<LayerGuardExit> {
    let config = cli.to_config().context("Failed to load settings")?;
    let analyzer = Analyzer::from_config(config).context("Failed to load layer model")?;

    let outcome = analyzer.run(cli.commit.as_deref())?;
    let report = match outcome {
        Outcome::NothingToAnalyze { revision } => {
            info!("nothing to analyze in {revision}");
            return Ok(LayerGuardExit::Success);
        }
        Outcome::Analyzed(report) => report,
    };

    match cli.format {
        ReportFormat::Text => reporting::print_report(&report),
        ReportFormat::Json => println!("{}", reporting::render_json(&report)?),
    }

    let stage = report.final_stage(cli.assert_mode);
    if stage == Stage::Failed {
        eprintln!(
            "{} {} layering violations found",
            "assertion failed:".red().bold(),
            report.classification.total_violations()
        );
    }
    Ok(LayerGuardExit::for_outcome(report.has_violations(), cli.assert_mode))
}
