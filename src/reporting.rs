// src/reporting.rs
//! Terminal and JSON rendering of analysis reports.

use colored::Colorize;
use std::collections::BTreeSet;
use std::fmt::Write;

use crate::pipeline::AnalysisReport;
use crate::types::{Layer, ViolationKind};

const KINDS: [ViolationKind; 2] = [ViolationKind::Back, ViolationKind::Skip];

/// Prints the human-readable report to stdout.
pub fn print_report(report: &AnalysisReport) {
    print!("{}", render_text(report));
}

/// Serializes the full report as pretty JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn render_json(report: &AnalysisReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[must_use]
pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    write_header(&mut out, report);
    for kind in KINDS {
        write_kind(&mut out, report, kind);
    }
    write_layers(&mut out, report);
    out
}

fn write_header(out: &mut String, report: &AnalysisReport) {
    let subject = report.subject.as_deref().unwrap_or("");
    let _ = writeln!(
        out,
        "\n{} {} {}",
        "LAYERING SCAN".cyan().bold(),
        short_revision(&report.revision).yellow(),
        subject.dimmed()
    );
    let _ = writeln!(
        out,
        "  {} files | {} dependencies | {} call edges ({} layered) | {} violations",
        report.files.len(),
        report.dependencies.len(),
        report.raw_edges,
        report.layered_edges,
        format_count(report.classification.total_violations()),
    );
}

fn write_kind(out: &mut String, report: &AnalysisReport, kind: ViolationKind) {
    let violations = report.violations(kind);
    if violations.is_empty() {
        let _ = writeln!(
            out,
            "\n  {} No {} found.",
            "✓".green(),
            kind_noun(kind)
        );
        return;
    }

    let _ = writeln!(
        out,
        "\n{} {} ({})",
        "▸".yellow(),
        kind.label().yellow().bold(),
        kind.description()
    );
    for v in violations {
        let _ = writeln!(
            out,
            "    {} (layer {}) → {}",
            v.edge.caller.display(),
            v.caller_layer,
            format!("{} (layer {})", v.edge.callee.display(), v.callee_layer).red()
        );
        let _ = writeln!(out, "      {}", v.suggestion().dimmed());
    }

    let index = report.score(kind).index;
    let _ = writeln!(
        out,
        "  Average {}: {}",
        kind.index_name(),
        format_index(index)
    );
}

fn write_layers(out: &mut String, report: &AnalysisReport) {
    if report.populations.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}", "LAYERS".cyan().bold());

    let layers: BTreeSet<Layer> = report.populations.keys().copied().collect();
    for layer in layers {
        let population = report.populations.get(&layer).copied().unwrap_or(0);
        let back = flagged_in(report, ViolationKind::Back, layer);
        let skip = flagged_in(report, ViolationKind::Skip, layer);
        let _ = writeln!(
            out,
            "  layer {layer}: {population} files | {} back | {} skip",
            format_count(back),
            format_count(skip)
        );
    }
}

fn flagged_in(report: &AnalysisReport, kind: ViolationKind, layer: Layer) -> usize {
    report
        .score(kind)
        .layers
        .iter()
        .find(|d| d.layer == layer)
        .map_or(0, |d| d.flagged)
}

fn kind_noun(kind: ViolationKind) -> &'static str {
    match kind {
        ViolationKind::Back => "back calls",
        ViolationKind::Skip => "skip calls",
    }
}

fn short_revision(revision: &str) -> &str {
    let is_hash = revision.len() == 40 && revision.chars().all(|c| c.is_ascii_hexdigit());
    if is_hash {
        &revision[..12]
    } else {
        revision
    }
}

fn format_count(n: usize) -> String {
    if n == 0 {
        n.to_string().green().to_string()
    } else {
        n.to_string().red().to_string()
    }
}

fn format_index(index: f64) -> String {
    let label = format!("{index:.3}");
    if index >= 1.0 {
        label.red().to_string()
    } else {
        label.yellow().to_string()
    }
}
