//! Borrowed view over one analysis result, shared by every renderer.

use salesmix_core::models::{PeriodAggregate, PeriodPercentage, SalesTotals};
use salesmix_core::periods::Granularity;

/// Counts and shares of one report, aligned period by period.
#[derive(Debug, Clone, Copy)]
pub struct ReportView<'a> {
    pub granularity: Granularity,
    pub aggregates: &'a [PeriodAggregate],
    pub percentages: &'a [PeriodPercentage],
    pub totals: &'a SalesTotals,
}

impl<'a> ReportView<'a> {
    pub fn new(
        granularity: Granularity,
        aggregates: &'a [PeriodAggregate],
        percentages: &'a [PeriodPercentage],
        totals: &'a SalesTotals,
    ) -> Self {
        Self {
            granularity,
            aggregates,
            percentages,
            totals,
        }
    }

    /// Chart / section title, e.g. `"Sales per quarter"`.
    pub fn title(&self) -> String {
        format!("Sales per {}", self.granularity)
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }

    /// Largest per-period total, used to scale the secondary axis.
    pub fn max_total(&self) -> u64 {
        self.aggregates
            .iter()
            .map(|a| a.total_count)
            .max()
            .unwrap_or(0)
    }

    /// Period labels in display order.
    pub fn labels(&self) -> Vec<String> {
        self.aggregates.iter().map(|a| a.period.label()).collect()
    }

    /// `(aggregate, percentage)` pairs in display order.
    pub fn rows(&self) -> impl Iterator<Item = (&'a PeriodAggregate, &'a PeriodPercentage)> {
        self.aggregates.iter().zip(self.percentages.iter())
    }
}
