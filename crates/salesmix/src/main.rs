mod bootstrap;

use std::path::Path;

use anyhow::{anyhow, Result};
use salesmix_core::settings::Settings;
use salesmix_core::SalesError;
use salesmix_data::analysis::{
    analyze_all_granularities, analyze_sales, AnalysisConfig, SalesReport,
};
use salesmix_ui::app::App;
use salesmix_ui::report::{render_banner, render_report};
use salesmix_ui::view::ReportView;
use serde_json::json;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("salesmix v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "File: {}, Granularity: {}, Start: {}",
        settings.file.display(),
        if settings.all { "all" } else { settings.granularity.as_str() },
        settings.start_date.as_deref().unwrap_or("-")
    );

    let config = AnalysisConfig::from(&settings);

    if settings.all {
        run_all(&settings, &config)
    } else {
        run_single(&settings, &config)
    }
}

// ── Run modes ──────────────────────────────────────────────────────────────────

fn run_single(settings: &Settings, config: &AnalysisConfig) -> Result<()> {
    let report = analyze_sales(config).map_err(|e| {
        tracing::error!("{}", e);
        anyhow!(describe_error(&e))
    })?;

    if settings.json_output() {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }

    if settings.chart {
        show_chart(settings, &report)?;
    }
    Ok(())
}

/// One analysis per granularity; a failing granularity is reported and the
/// others still run.
fn run_all(settings: &Settings, config: &AnalysisConfig) -> Result<()> {
    let results = analyze_all_granularities(config);

    if settings.json_output() {
        let entries: Vec<serde_json::Value> = results
            .iter()
            .map(|(granularity, result)| match result {
                Ok(report) => json!({ "granularity": granularity, "report": report }),
                Err(e) => json!({ "granularity": granularity, "error": describe_error(e) }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for (granularity, result) in &results {
            print!("\n{}", render_banner(&format!("Analysis per {}", granularity)));
            match result {
                Ok(report) => print!("{}", render_text(report)),
                Err(e) => {
                    tracing::warn!("{} analysis failed: {}", granularity, e);
                    eprintln!("{}", describe_error(e));
                }
            }
        }
    }

    if settings.chart {
        for report in results.iter().filter_map(|(_, r)| r.as_ref().ok()) {
            show_chart(settings, report)?;
        }
    }
    Ok(())
}

// ── Presentation ───────────────────────────────────────────────────────────────

fn view_of(report: &SalesReport) -> ReportView<'_> {
    ReportView::new(
        report.granularity,
        &report.aggregates,
        &report.percentages,
        &report.totals,
    )
}

fn render_text(report: &SalesReport) -> String {
    render_report(&view_of(report))
}

fn show_chart(settings: &Settings, report: &SalesReport) -> Result<()> {
    let source = file_name(&report.metadata.source);
    let app = App::new(&settings.theme, source);
    app.run(&view_of(report))?;
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// User-facing message for each failure kind.
fn describe_error(err: &SalesError) -> String {
    match err {
        SalesError::SourceNotFound { path, .. } => {
            format!("File not found: {}", path.display())
        }
        SalesError::SourceRead { .. } => format!("Read error: {}", err),
        SalesError::MissingField { .. } => format!("Column error: {}", err),
        SalesError::DateParse { .. } => format!("Date error: {}", err),
        SalesError::UnsupportedGranularity(_) => format!("Configuration error: {}", err),
        SalesError::EmptyResult { .. } => format!("Nothing to analyse: {}", err),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
