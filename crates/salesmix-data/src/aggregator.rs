//! Francophone / other sale counts over calendar periods.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use salesmix_core::countries::CountryClassifier;
use salesmix_core::models::{PeriodAggregate, PeriodPercentage, SalesTotals, TransactionRecord};
use salesmix_core::periods::{bucket_period, Granularity, PeriodKey};
use salesmix_core::{Result, SalesError};

// ── SalesAggregator ───────────────────────────────────────────────────────────

/// Groups transactions by period and counts them per country class.
///
/// Holds no state besides the classifier, so the same input always yields
/// the same output.
#[derive(Debug, Clone, Default)]
pub struct SalesAggregator {
    classifier: CountryClassifier,
}

impl SalesAggregator {
    pub fn new(classifier: CountryClassifier) -> Self {
        Self { classifier }
    }

    /// Count `records` per `granularity` bucket.
    ///
    /// Only periods containing at least one record are returned, sorted
    /// chronologically.
    pub fn aggregate(
        &self,
        records: &[TransactionRecord],
        granularity: Granularity,
    ) -> Vec<PeriodAggregate> {
        let mut map: BTreeMap<PeriodKey, PeriodAggregate> = BTreeMap::new();

        for record in records {
            let key = bucket_period(record.date, granularity);
            map.entry(key)
                .or_insert_with(|| PeriodAggregate::new(key))
                .record(self.classifier.is_francophone(&record.country));
        }

        map.into_values().collect()
    }

    /// Per-period shares, in the same order as `aggregates`.
    pub fn to_percentages(aggregates: &[PeriodAggregate]) -> Vec<PeriodPercentage> {
        aggregates.iter().map(PeriodPercentage::from).collect()
    }

    /// Sum the counts of all periods.
    pub fn calculate_totals(aggregates: &[PeriodAggregate]) -> SalesTotals {
        let mut totals = SalesTotals::default();
        for agg in aggregates {
            totals.francophone_count += agg.francophone_count;
            totals.other_count += agg.other_count;
            totals.total_count += agg.total_count;
            totals.periods += 1;
        }
        totals
    }
}

// ── Start-date filter ─────────────────────────────────────────────────────────

/// Parse a `YYYY-MM-DD` cutoff date.
pub fn parse_start_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| SalesError::DateParse {
        value: raw.to_string(),
        context: "start date".to_string(),
    })
}

/// Keep records dated on or after `start_date` (inclusive).
///
/// An empty result is returned as-is; the pipeline turns it into
/// [`SalesError::EmptyResult`].
pub fn filter_by_start_date(
    records: Vec<TransactionRecord>,
    start_date: &str,
) -> Result<Vec<TransactionRecord>> {
    let cutoff = parse_start_date(start_date)?;
    Ok(retain_from(records, cutoff))
}

/// Same as [`filter_by_start_date`] with an already parsed cutoff.
pub fn retain_from(mut records: Vec<TransactionRecord>, cutoff: NaiveDate) -> Vec<TransactionRecord> {
    records.retain(|r| r.date >= cutoff);
    records
}

// ── Tests ─────────────────────────────────────────────────────────────────────
