//! End-to-end analysis pipeline.
//!
//! Loads the export, applies the start-date cutoff, aggregates and derives
//! percentages, returning a [`SalesReport`] ready for the presentation layer.
//! Any error aborts the run; no partial report is produced.

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use salesmix_core::countries::CountryClassifier;
use salesmix_core::models::{PeriodAggregate, PeriodPercentage, SalesTotals};
use salesmix_core::periods::Granularity;
use salesmix_core::settings::Settings;
use salesmix_core::{Result, SalesError};
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregator::{parse_start_date, retain_from, SalesAggregator};
use crate::reader::{read_transactions, DateOrder, DEFAULT_DELIMITER};

// ── Public types ──────────────────────────────────────────────────────────────

/// Inputs of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// CSV export to read.
    pub path: PathBuf,
    /// Header name of the country column.
    pub country_field: String,
    /// Header name of the date column.
    pub date_field: String,
    /// Granularity name or code, validated when the run starts.
    pub granularity: String,
    /// Inclusive `YYYY-MM-DD` cutoff; `None` keeps everything.
    pub start_date: Option<String>,
    pub delimiter: u8,
    /// Reading of ambiguous `NN/NN/YYYY` dates.
    pub date_order: DateOrder,
}

impl AnalysisConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            country_field: "Customer country code".to_string(),
            date_field: "Sale Date".to_string(),
            granularity: Granularity::Month.to_string(),
            start_date: None,
            delimiter: DEFAULT_DELIMITER,
            date_order: DateOrder::default(),
        }
    }
}

impl From<&Settings> for AnalysisConfig {
    fn from(s: &Settings) -> Self {
        Self {
            path: s.file.clone(),
            country_field: s.country_field.clone(),
            date_field: s.date_field.clone(),
            granularity: s.granularity.clone(),
            start_date: s.start_date.clone(),
            delimiter: s.delimiter,
            date_order: DateOrder::from_day_first(s.day_first),
        }
    }
}

/// Facts about the loaded data, reported next to the results.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub source: PathBuf,
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    /// Rows read from the export.
    pub rows_read: usize,
    /// Rows left after the start-date cutoff.
    pub rows_kept: usize,
    pub start_date: Option<NaiveDate>,
    pub first_sale: Option<NaiveDate>,
    pub last_sale: Option<NaiveDate>,
}

/// Complete output of [`analyze_sales`].
#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub granularity: Granularity,
    /// Raw counts, one row per non-empty period, chronological.
    pub aggregates: Vec<PeriodAggregate>,
    /// Shares, aligned with `aggregates`.
    pub percentages: Vec<PeriodPercentage>,
    pub totals: SalesTotals,
    pub metadata: ReportMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the pipeline with the default francophone classifier.
pub fn analyze_sales(config: &AnalysisConfig) -> Result<SalesReport> {
    analyze_sales_with(config, &SalesAggregator::new(CountryClassifier::francophone()))
}

/// Run the pipeline with an explicit aggregator.
///
/// 1. Validate granularity and start date.
/// 2. Load records (field names checked against the header).
/// 3. Drop records before the start date; fail if none remain.
/// 4. Aggregate, derive percentages and totals.
pub fn analyze_sales_with(
    config: &AnalysisConfig,
    aggregator: &SalesAggregator,
) -> Result<SalesReport> {
    let granularity: Granularity = config.granularity.parse()?;
    let start_date = config
        .start_date
        .as_deref()
        .map(parse_start_date)
        .transpose()?;

    let records = read_transactions(
        &config.path,
        &config.country_field,
        &config.date_field,
        config.delimiter,
        config.date_order,
    )?;
    let rows_read = records.len();
    info!("Loaded {} rows from {}", rows_read, config.path.display());

    let records = match start_date {
        Some(cutoff) => retain_from(records, cutoff),
        None => records,
    };
    if let Some(cutoff) = start_date {
        info!(
            "Kept {} of {} rows on or after {}",
            records.len(),
            rows_read,
            cutoff
        );
    }
    if records.is_empty() {
        return Err(SalesError::EmptyResult { start: start_date });
    }

    let aggregates = aggregator.aggregate(&records, granularity);
    let percentages = SalesAggregator::to_percentages(&aggregates);
    let totals = SalesAggregator::calculate_totals(&aggregates);
    debug!(
        "Aggregated {} rows into {} {} periods",
        records.len(),
        aggregates.len(),
        granularity
    );

    let metadata = ReportMetadata {
        source: config.path.clone(),
        generated_at: Utc::now().to_rfc3339(),
        rows_read,
        rows_kept: records.len(),
        start_date,
        first_sale: records.iter().map(|r| r.date).min(),
        last_sale: records.iter().map(|r| r.date).max(),
    };

    Ok(SalesReport {
        granularity,
        aggregates,
        percentages,
        totals,
        metadata,
    })
}

/// Run [`analyze_sales`] once per granularity, week first.
///
/// A failure for one granularity is kept in its slot and the remaining
/// granularities still run.
pub fn analyze_all_granularities(config: &AnalysisConfig) -> Vec<(Granularity, Result<SalesReport>)> {
    Granularity::ALL
        .iter()
        .map(|&granularity| {
            let run = AnalysisConfig {
                granularity: granularity.to_string(),
                ..config.clone()
            };
            (granularity, analyze_sales(&run))
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
