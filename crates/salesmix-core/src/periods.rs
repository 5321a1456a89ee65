//! Calendar bucketing of transaction dates.
//!
//! A [`PeriodKey`] is the first day of a calendar-aligned bucket together with
//! its [`Granularity`]. Weeks follow ISO 8601 (Monday start), quarters are
//! three-month blocks starting in January, April, July and October.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::SalesError;

// ── Granularity ───────────────────────────────────────────────────────────────

/// Size of the time bucket used to group transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Week,
    Month,
    Quarter,
    Year,
}

impl Granularity {
    /// All granularities, finest first.
    pub const ALL: [Granularity; 4] = [
        Granularity::Week,
        Granularity::Month,
        Granularity::Quarter,
        Granularity::Year,
    ];

    /// Lowercase name, e.g. `"quarter"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Quarter => "quarter",
            Granularity::Year => "year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = SalesError;

    /// Accepts the full name or the single-letter code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" | "w" => Ok(Granularity::Week),
            "month" | "m" => Ok(Granularity::Month),
            "quarter" | "q" => Ok(Granularity::Quarter),
            "year" | "y" => Ok(Granularity::Year),
            _ => Err(SalesError::UnsupportedGranularity(s.to_string())),
        }
    }
}

// ── PeriodKey ─────────────────────────────────────────────────────────────────

/// A calendar bucket. Orders chronologically by its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodKey {
    start: NaiveDate,
    granularity: Granularity,
}

impl PeriodKey {
    /// First day of the bucket.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the bucket (inclusive), clamped to [`NaiveDate::MAX`].
    pub fn end(&self) -> NaiveDate {
        let end = match self.granularity {
            Granularity::Week => self.start.checked_add_days(Days::new(6)),
            Granularity::Month => self.start.checked_add_months(Months::new(1)),
            Granularity::Quarter => self.start.checked_add_months(Months::new(3)),
            Granularity::Year => self.start.checked_add_months(Months::new(12)),
        };
        let end = match self.granularity {
            Granularity::Week => end,
            _ => end.and_then(|next| next.checked_sub_days(Days::new(1))),
        };
        end.unwrap_or(NaiveDate::MAX)
    }

    /// Display label: `2020-W03`, `2020-01`, `2020Q1` or `2020`.
    pub fn label(&self) -> String {
        match self.granularity {
            Granularity::Week => {
                let iso = self.start.iso_week();
                format!("{}-W{:02}", iso.year(), iso.week())
            }
            Granularity::Month => self.start.format("%Y-%m").to_string(),
            Granularity::Quarter => {
                format!("{}Q{}", self.start.year(), self.start.month0() / 3 + 1)
            }
            Granularity::Year => self.start.year().to_string(),
        }
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PeriodKey", 4)?;
        state.serialize_field("label", &self.label())?;
        state.serialize_field("granularity", &self.granularity)?;
        state.serialize_field("start", &self.start)?;
        state.serialize_field("end", &self.end())?;
        state.end()
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Return the bucket of `granularity` that contains `date`.
///
/// A week starting before [`NaiveDate::MIN`] is clamped to it.
pub fn bucket_period(date: NaiveDate, granularity: Granularity) -> PeriodKey {
    let start = match granularity {
        Granularity::Week => date
            .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
            .unwrap_or(NaiveDate::MIN),
        Granularity::Month => month_start(date),
        Granularity::Quarter => month_start(date) - Months::new(date.month0() % 3),
        Granularity::Year => date - Days::new(u64::from(date.ordinal0())),
    };
    PeriodKey { start, granularity }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // ── Granularity parsing ──────────────────────────────────────────────────

    #[test]
    fn test_granularity_parses_names_and_codes() {
        assert_eq!("week".parse::<Granularity>().unwrap(), Granularity::Week);
        assert_eq!("W".parse::<Granularity>().unwrap(), Granularity::Week);
        assert_eq!("Month".parse::<Granularity>().unwrap(), Granularity::Month);
        assert_eq!("q".parse::<Granularity>().unwrap(), Granularity::Quarter);
        assert_eq!(" YEAR ".parse::<Granularity>().unwrap(), Granularity::Year);
    }

    #[test]
    fn test_granularity_rejects_unknown() {
        let err = "D".parse::<Granularity>().unwrap_err();
        assert!(matches!(err, SalesError::UnsupportedGranularity(ref s) if s == "D"));
        assert!("fortnight".parse::<Granularity>().is_err());
        assert!("".parse::<Granularity>().is_err());
    }

    // ── Week ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_week_starts_on_monday() {
        // 2020-01-15 is a Wednesday.
        let key = bucket_period(d(2020, 1, 15), Granularity::Week);
        assert_eq!(key.start(), d(2020, 1, 13));
        assert_eq!(key.end(), d(2020, 1, 19));
        assert_eq!(key.label(), "2020-W03");
    }

    #[test]
    fn test_week_label_uses_iso_year() {
        // 2019-12-31 belongs to ISO week 1 of 2020.
        let key = bucket_period(d(2019, 12, 31), Granularity::Week);
        assert_eq!(key.start(), d(2019, 12, 30));
        assert_eq!(key.label(), "2020-W01");
    }

    #[test]
    fn test_sunday_belongs_to_previous_monday() {
        let key = bucket_period(d(2020, 1, 19), Granularity::Week);
        assert_eq!(key.start(), d(2020, 1, 13));
    }

    // ── Month / quarter / year ───────────────────────────────────────────────

    #[test]
    fn test_month_bucket() {
        let key = bucket_period(d(2020, 2, 29), Granularity::Month);
        assert_eq!(key.start(), d(2020, 2, 1));
        assert_eq!(key.end(), d(2020, 2, 29));
        assert_eq!(key.label(), "2020-02");
    }

    #[test]
    fn test_quarter_bucket() {
        let key = bucket_period(d(2021, 8, 17), Granularity::Quarter);
        assert_eq!(key.start(), d(2021, 7, 1));
        assert_eq!(key.end(), d(2021, 9, 30));
        assert_eq!(key.label(), "2021Q3");

        let key = bucket_period(d(2021, 1, 1), Granularity::Quarter);
        assert_eq!(key.start(), d(2021, 1, 1));
        assert_eq!(key.label(), "2021Q1");

        let key = bucket_period(d(2021, 12, 31), Granularity::Quarter);
        assert_eq!(key.start(), d(2021, 10, 1));
        assert_eq!(key.end(), d(2021, 12, 31));
    }

    #[test]
    fn test_year_bucket() {
        let key = bucket_period(d(2024, 6, 30), Granularity::Year);
        assert_eq!(key.start(), d(2024, 1, 1));
        assert_eq!(key.end(), d(2024, 12, 31));
        assert_eq!(key.label(), "2024");
    }

    // ── Calendar edges ───────────────────────────────────────────────────────

    #[test]
    fn test_buckets_at_calendar_edges_do_not_overflow() {
        for granularity in Granularity::ALL {
            let last = bucket_period(NaiveDate::MAX, granularity);
            assert_eq!(last.end(), NaiveDate::MAX, "granularity {granularity}");
            assert!(last.start() <= NaiveDate::MAX);
            assert!(!last.label().is_empty());

            let first = bucket_period(NaiveDate::MIN, granularity);
            assert_eq!(first.start(), NaiveDate::MIN, "granularity {granularity}");
            assert!(first.end() >= NaiveDate::MIN);
            assert!(serde_json::to_string(&first).is_ok());
        }
    }

    #[test]
    fn test_month_end_in_year_9999() {
        let key = bucket_period(d(9999, 12, 15), Granularity::Month);
        assert_eq!(key.end(), d(9999, 12, 31));
    }

    // ── Ordering ─────────────────────────────────────────────────────────────

    #[test]
    fn test_period_keys_sort_chronologically() {
        let dates = [
            d(2022, 3, 4),
            d(2019, 12, 31),
            d(2021, 7, 1),
            d(2020, 1, 1),
            d(2021, 6, 30),
        ];
        for granularity in Granularity::ALL {
            let mut sorted_dates = dates.to_vec();
            sorted_dates.sort();
            let keys: Vec<PeriodKey> = sorted_dates
                .iter()
                .map(|date| bucket_period(*date, granularity))
                .collect();
            let mut sorted_keys = keys.clone();
            sorted_keys.sort();
            assert_eq!(keys, sorted_keys, "granularity {granularity}");
        }
    }

    #[test]
    fn test_period_key_serializes_boundaries() {
        let key = bucket_period(d(2020, 5, 9), Granularity::Quarter);
        let json = serde_json::to_value(key).unwrap();
        assert_eq!(json["label"], "2020Q2");
        assert_eq!(json["granularity"], "quarter");
        assert_eq!(json["start"], "2020-04-01");
        assert_eq!(json["end"], "2020-06-30");
    }

    #[test]
    fn test_same_bucket_keys_are_equal() {
        assert_eq!(
            bucket_period(d(2020, 1, 2), Granularity::Month),
            bucket_period(d(2020, 1, 31), Granularity::Month)
        );
        assert_ne!(
            bucket_period(d(2020, 1, 31), Granularity::Month),
            bucket_period(d(2020, 2, 1), Granularity::Month)
        );
    }
}
