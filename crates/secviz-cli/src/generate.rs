//! `secviz graph`: runs the derivation pipeline for each configured taxonomy.

use std::path::Path;
use std::time::Duration;

use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};

use secviz_core::{AttackPattern, Config, Cwe, FileGraphSink, RunReport, TaxonomyPipeline, TaxonomyRecord};

/// Runs CAPEC then CWE, whichever inputs are configured.
///
/// A fatal error in one taxonomy does not keep the other from running; the
/// first error is returned once both have been attempted.
pub fn run(config: &Config) -> Result<Vec<RunReport>> {
    let capec = config.input.capec_json.as_deref();
    let cwe = config.input.cwe_json.as_deref();
    if capec.is_none() && cwe.is_none() {
        bail!("No input given. Pass --capec-json and/or --cwe-json, or set them in secviz.toml");
    }

    let sink = FileGraphSink::new(&config.output.graph_dir).with_pretty(config.output.pretty);
    let mut pipeline = TaxonomyPipeline::new(sink);
    let mut reports = Vec::new();
    let mut failures = Vec::new();

    if let Some(path) = capec {
        match run_one::<AttackPattern, _>(&mut pipeline, path) {
            Ok(report) => reports.push(report),
            Err(e) => {
                tracing::error!("{}", e);
                failures.push(e);
            }
        }
    }
    if let Some(path) = cwe {
        match run_one::<Cwe, _>(&mut pipeline, path) {
            Ok(report) => reports.push(report),
            Err(e) => {
                tracing::error!("{}", e);
                failures.push(e);
            }
        }
    }

    match failures.into_iter().next() {
        Some(first) => Err(first),
        None => Ok(reports),
    }
}

fn run_one<R: TaxonomyRecord, S: secviz_core::GraphSink>(
    pipeline: &mut TaxonomyPipeline<S>,
    path: &Path,
) -> Result<RunReport> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("Deriving {} graphs from {}", R::TAXONOMY, path.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = pipeline
        .run_file::<R>(path)
        .wrap_err_with(|| format!("Failed to derive {} graphs from {}", R::TAXONOMY, path.display()));
    spinner.finish_and_clear();

    result
}

/// Prints a per-taxonomy summary to stdout.
pub fn print_summary(reports: &[RunReport], graph_dir: &Path) {
    for report in reports {
        println!(
            "{}: {} records, {} nodes, {} edges, {} subgraphs",
            report.taxonomy,
            report.records,
            report.nodes,
            report.edges,
            report.subgraphs.len()
        );
        for line in index_lines(report) {
            println!("{}", line);
        }
        if !report.issues.is_empty() {
            println!("  {} records excluded:", report.issues.len());
            for issue in &report.issues {
                println!("    - {}", issue);
            }
        }
        if !report.dangling.is_empty() {
            println!("  {} dangling targets: {}", report.dangling.len(), report.dangling.join(", "));
        }
        if !report.unknown_abstraction.is_empty() {
            println!(
                "  {} records with unknown abstraction",
                report.unknown_abstraction.len()
            );
        }
    }

    let documents: usize = reports.iter().map(RunReport::documents).sum();
    println!("Wrote {} graph documents to {}", documents, graph_dir.display());
}

/// Index of the written subgraphs: roots by name, nested roots indented.
fn index_lines(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in report.index() {
        lines.push(format!("  {} {} ({})", entry.root.root_id, entry.root.name(), entry.root.file_name));
        for child in &entry.children {
            lines.push(format!("    {} {} ({})", child.root_id, child.name(), child.file_name));
        }
    }
    lines
}
