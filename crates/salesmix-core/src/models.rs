use chrono::NaiveDate;
use serde::Serialize;

use crate::periods::PeriodKey;

/// One sale as read from the export: a raw country code and a calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Country code exactly as found in the source (not yet normalized).
    pub country: String,
    /// Sale date; time of day is discarded on load.
    pub date: NaiveDate,
}

impl TransactionRecord {
    pub fn new(country: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            country: country.into(),
            date,
        }
    }
}

/// Sale counts for one period.
///
/// `francophone_count + other_count == total_count` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodAggregate {
    pub period: PeriodKey,
    pub francophone_count: u64,
    pub other_count: u64,
    pub total_count: u64,
}

impl PeriodAggregate {
    /// Empty aggregate for `period`; both classification columns start at 0.
    pub fn new(period: PeriodKey) -> Self {
        Self {
            period,
            francophone_count: 0,
            other_count: 0,
            total_count: 0,
        }
    }

    /// Count one sale.
    pub fn record(&mut self, francophone: bool) {
        if francophone {
            self.francophone_count += 1;
        } else {
            self.other_count += 1;
        }
        self.total_count += 1;
    }
}

/// Share of each class within one period, on a 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodPercentage {
    pub period: PeriodKey,
    pub francophone_pct: f64,
    pub other_pct: f64,
    /// `100.0` when the period has sales, `0.0` otherwise.
    pub total_pct: f64,
}

impl From<&PeriodAggregate> for PeriodPercentage {
    fn from(agg: &PeriodAggregate) -> Self {
        if agg.total_count == 0 {
            return Self {
                period: agg.period,
                francophone_pct: 0.0,
                other_pct: 0.0,
                total_pct: 0.0,
            };
        }
        let francophone_pct = 100.0 * agg.francophone_count as f64 / agg.total_count as f64;
        Self {
            period: agg.period,
            francophone_pct,
            other_pct: 100.0 - francophone_pct,
            total_pct: 100.0,
        }
    }
}

/// Grand totals across every period of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SalesTotals {
    pub francophone_count: u64,
    pub other_count: u64,
    pub total_count: u64,
    /// Number of periods summed.
    pub periods: usize,
}

impl SalesTotals {
    /// Overall francophone share, `None` when there are no sales.
    pub fn francophone_pct(&self) -> Option<f64> {
        if self.total_count == 0 {
            None
        } else {
            Some(100.0 * self.francophone_count as f64 / self.total_count as f64)
        }
    }

    /// Overall share of other countries, `None` when there are no sales.
    pub fn other_pct(&self) -> Option<f64> {
        self.francophone_pct().map(|pct| 100.0 - pct)
    }
}
