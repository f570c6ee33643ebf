use std::io::Write;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use process_insight::{analyze, export_dfg_to_dot, AnalysisReport};

mod cli;
mod output;

fn main() {
    if let Err(error) = run() {
        eprintln!("process-insight error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;
    run_with(&cli, &mut std::io::stdout().lock())
}

fn run_with<W: Write>(cli: &cli::Cli, out: &mut W) -> anyhow::Result<()> {
    let config = cli.analysis_config()?;
    let source = cli.source();
    let table = source
        .load(cli.import_options())
        .with_context(|| match &cli.input {
            Some(path) => format!("failed to load event data from '{}'", path.display()),
            None => "failed to load built-in sample".to_string(),
        })?;
    tracing::info!(
        events = table.num_events(),
        cases = table.num_cases(),
        "loaded event data"
    );

    let report = analyze(&table, &config);

    if let Some(path) = &cli.dot {
        write_dot(&report, path)?;
    }
    if let Some(path) = &cli.svg {
        render_image(&report, path, ImageFormat::Svg)?;
    }
    if let Some(path) = &cli.png {
        render_image(&report, path, ImageFormat::Png)?;
    }

    if cli.json {
        let json = report
            .to_json_pretty()
            .context("failed to serialize analysis report")?;
        writeln!(out, "{json}")?;
    } else {
        write!(out, "{}", output::render_text(&report))?;
    }
    out.flush()?;
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn write_dot(report: &AnalysisReport, path: &Path) -> anyhow::Result<()> {
    let dot = export_dfg_to_dot(&report.dfg, Some(&report.bottlenecks));
    std::fs::write(path, dot)
        .with_context(|| format!("failed to write DOT file '{}'", path.display()))?;
    tracing::info!(path = %path.display(), "wrote directly-follows graph");
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum ImageFormat {
    Svg,
    Png,
}

#[cfg(feature = "graphviz-export")]
fn render_image(report: &AnalysisReport, path: &Path, format: ImageFormat) -> anyhow::Result<()> {
    use process_insight::{export_dfg_image_png, export_dfg_image_svg};

    let bottlenecks = Some(&report.bottlenecks);
    let result = match format {
        ImageFormat::Svg => export_dfg_image_svg(&report.dfg, bottlenecks, path),
        ImageFormat::Png => export_dfg_image_png(&report.dfg, bottlenecks, path),
    };
    result.with_context(|| {
        format!(
            "failed to render '{}' (is graphviz installed and on PATH?)",
            path.display()
        )
    })?;
    tracing::info!(path = %path.display(), "rendered directly-follows graph");
    Ok(())
}

#[cfg(not(feature = "graphviz-export"))]
fn render_image(_report: &AnalysisReport, path: &Path, format: ImageFormat) -> anyhow::Result<()> {
    anyhow::bail!(
        "cannot write {format:?} image '{}': built without the graphviz-export feature",
        path.display()
    )
}
