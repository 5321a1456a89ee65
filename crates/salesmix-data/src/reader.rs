//! CSV loading for sales exports.
//!
//! Reads a delimited export (Dolibarr uses `;`), locates the configured
//! country and date columns by header name and converts every row into a
//! [`TransactionRecord`].

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use salesmix_core::models::TransactionRecord;
use salesmix_core::{Result, SalesError};
use tracing::{debug, warn};

/// Delimiter used by Dolibarr sales exports.
pub const DEFAULT_DELIMITER: u8 = b';';

const BOM: char = '\u{feff}';

/// Years accepted in record dates; anything outside is a parse error.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const MONTH_FIRST_FORMATS: &[&str] = &["%m/%d/%Y", "%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M"];

const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%Y", "%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"];

/// How to read an ambiguous slash date such as `01/02/2020`.
///
/// The preferred order is tried first; the other one is only used when the
/// value cannot be read that way (`15/01/2020` month-first).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateOrder {
    /// `MM/DD/YYYY`: `01/02/2020` is 2 January.
    #[default]
    MonthFirst,
    /// `DD/MM/YYYY`: `01/02/2020` is 1 February.
    DayFirst,
}

impl DateOrder {
    pub fn from_day_first(day_first: bool) -> Self {
        if day_first {
            DateOrder::DayFirst
        } else {
            DateOrder::MonthFirst
        }
    }

    fn slash_formats(self) -> [&'static [&'static str]; 2] {
        match self {
            DateOrder::MonthFirst => [MONTH_FIRST_FORMATS, DAY_FIRST_FORMATS],
            DateOrder::DayFirst => [DAY_FIRST_FORMATS, MONTH_FIRST_FORMATS],
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every row of `path` as a [`TransactionRecord`].
///
/// Fails with [`SalesError::MissingField`] before reading any row when either
/// column is absent, and with [`SalesError::DateParse`] on the first row
/// whose date cannot be parsed.
pub fn read_transactions(
    path: &Path,
    country_field: &str,
    date_field: &str,
    delimiter: u8,
    date_order: DateOrder,
) -> Result<Vec<TransactionRecord>> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SalesError::SourceNotFound {
                path: path.to_path_buf(),
                source: e,
            }
        } else {
            SalesError::SourceRead {
                path: path.to_path_buf(),
                source: csv::Error::from(e),
            }
        }
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let read_error = |source: csv::Error| SalesError::SourceRead {
        path: path.to_path_buf(),
        source,
    };

    let headers: Vec<String> = reader
        .headers()
        .map_err(read_error)?
        .iter()
        .map(|h| h.trim_start_matches(BOM).to_string())
        .collect();

    let country_idx = find_field(&headers, country_field)?;
    let date_idx = find_field(&headers, date_field)?;

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.map_err(read_error)?;
        let raw_date = row.get(date_idx).unwrap_or("");
        let date = parse_record_date(raw_date, date_order).ok_or_else(|| SalesError::DateParse {
            value: raw_date.to_string(),
            // +2: one for the header line, one for 1-based numbering.
            context: format!("line {}, field '{}'", i + 2, date_field),
        })?;
        let country = row.get(country_idx).unwrap_or("");
        records.push(TransactionRecord::new(country, date));
    }

    if records.is_empty() {
        warn!("No data rows in {}", path.display());
    }
    debug!("Read {} rows from {}", records.len(), path.display());

    Ok(records)
}

/// Parse a sale date, discarding any time-of-day component.
///
/// Accepts ISO dates and datetimes (with or without `T`, fractional seconds
/// or an RFC 3339 offset) and slash dates read in `order`. Years outside
/// 1..=9999 are rejected.
pub fn parse_record_date(raw: &str, order: DateOrder) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    parse_any(s, order).filter(|date| YEAR_RANGE.contains(&date.year()))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn parse_any(s: &str, order: DateOrder) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Some(date) = first_match(s, ISO_DATETIME_FORMATS) {
        return Some(date);
    }
    order
        .slash_formats()
        .into_iter()
        .find_map(|formats| first_match(s, formats))
}

fn first_match(s: &str, formats: &[&str]) -> Option<NaiveDate> {
    formats.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(s, fmt)
            .ok()
            .or_else(|| NaiveDateTime::parse_from_str(s, fmt).ok().map(|dt| dt.date()))
    })
}

fn find_field(headers: &[String], field: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == field)
        .ok_or_else(|| SalesError::MissingField {
            field: field.to_string(),
            available: headers.to_vec(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(content.as_bytes()).expect("write");
        file.flush().expect("flush");
        file
    }

    fn read(
        path: &Path,
        country: &str,
        date: &str,
        delimiter: u8,
    ) -> Result<Vec<TransactionRecord>> {
        read_transactions(path, country, date, delimiter, DateOrder::default())
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // ── parse_record_date ─────────────────────────────────────────────────────

    #[test]
    fn test_parse_record_date_formats() {
        let order = DateOrder::default();
        assert_eq!(parse_record_date("2020-01-15", order), Some(d(2020, 1, 15)));
        assert_eq!(parse_record_date(" 2020-01-15 ", order), Some(d(2020, 1, 15)));
        assert_eq!(parse_record_date("2020-01-15 23:59:59", order), Some(d(2020, 1, 15)));
        assert_eq!(parse_record_date("2020-01-15 08:30", order), Some(d(2020, 1, 15)));
        assert_eq!(parse_record_date("2020-01-15T08:30:00", order), Some(d(2020, 1, 15)));
        assert_eq!(parse_record_date("2020-01-15T08:30:00.250", order), Some(d(2020, 1, 15)));
        assert_eq!(parse_record_date("2020-01-15T08:30:00+02:00", order), Some(d(2020, 1, 15)));
        assert_eq!(parse_record_date("01/15/2020", order), Some(d(2020, 1, 15)));
        assert_eq!(parse_record_date("01/15/2020 10:00", order), Some(d(2020, 1, 15)));
    }

    #[test]
    fn test_ambiguous_slash_date_is_month_first_by_default() {
        assert_eq!(
            parse_record_date("01/02/2020", DateOrder::MonthFirst),
            Some(d(2020, 1, 2))
        );
        assert_eq!(
            parse_record_date("01/02/2020 09:15:00", DateOrder::MonthFirst),
            Some(d(2020, 1, 2))
        );
    }

    #[test]
    fn test_ambiguous_slash_date_day_first() {
        assert_eq!(
            parse_record_date("01/02/2020", DateOrder::DayFirst),
            Some(d(2020, 2, 1))
        );
        assert_eq!(
            parse_record_date("02/03/2021 10:00", DateOrder::DayFirst),
            Some(d(2021, 3, 2))
        );
    }

    #[test]
    fn test_slash_date_falls_back_to_other_order() {
        assert_eq!(
            parse_record_date("15/01/2020", DateOrder::MonthFirst),
            Some(d(2020, 1, 15))
        );
        assert_eq!(
            parse_record_date("01/15/2020", DateOrder::DayFirst),
            Some(d(2020, 1, 15))
        );
    }

    #[test]
    fn test_parse_record_date_rejects_garbage() {
        let order = DateOrder::default();
        assert_eq!(parse_record_date("", order), None);
        assert_eq!(parse_record_date("yesterday", order), None);
        assert_eq!(parse_record_date("2020-13-01", order), None);
        assert_eq!(parse_record_date("31/02/2020", order), None);
        assert_eq!(parse_record_date("13/13/2020", order), None);
    }

    #[test]
    fn test_parse_record_date_rejects_out_of_range_years() {
        let order = DateOrder::default();
        assert_eq!(parse_record_date("9999-12-31", order), Some(d(9999, 12, 31)));
        assert_eq!(parse_record_date("+262142-06-01", order), None);
        assert_eq!(parse_record_date("+262142-12-31", order), None);
        assert_eq!(parse_record_date("-262143-01-01", order), None);
        assert_eq!(parse_record_date("0000-01-01", order), None);
    }

    // ── read_transactions ─────────────────────────────────────────────────────

    #[test]
    fn test_read_semicolon_export() {
        let file = write_csv(
            "Ref;Customer country code;Sale Date;Amount\n\
             FA001;FR;2020-01-15;10.00\n\
             FA002; us ;2020-01-20;12.50\n\
             FA003;CA;2020-02-01 14:00:00;8.00\n",
        );
        let records = read(file.path(), "Customer country code", "Sale Date", b';').unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0], TransactionRecord::new("FR", d(2020, 1, 15)));
        assert_eq!(records[1].country, "us");
        assert_eq!(records[2].date, d(2020, 2, 1));
    }

    #[test]
    fn test_read_strips_bom_from_first_header() {
        let file = write_csv("\u{feff}pays;date\nbe;2021-05-05\n");
        let records = read(file.path(), "pays", "date", b';').unwrap();
        assert_eq!(records, vec![TransactionRecord::new("be", d(2021, 5, 5))]);
    }

    #[test]
    fn test_read_custom_delimiter() {
        let file = write_csv("pays,date\nlu,2021-05-05\n");
        let records = read(file.path(), "pays", "date", b',').unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_read_short_row_yields_empty_country() {
        let file = write_csv("date;pays\n2021-05-05\n");
        let records = read(file.path(), "pays", "date", b';').unwrap();
        assert_eq!(records, vec![TransactionRecord::new("", d(2021, 5, 5))]);
    }

    #[test]
    fn test_read_missing_country_field_lists_headers() {
        let file = write_csv("Ref;Sale Date\nFA001;2020-01-15\n");
        let err = read(file.path(), "Customer country code", "Sale Date", b';').unwrap_err();

        match err {
            SalesError::MissingField { field, available } => {
                assert_eq!(field, "Customer country code");
                assert_eq!(available, vec!["Ref".to_string(), "Sale Date".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_missing_date_field() {
        let file = write_csv("pays;jour\nfr;2020-01-15\n");
        let err = read(file.path(), "pays", "date", b';').unwrap_err();
        assert!(matches!(err, SalesError::MissingField { ref field, .. } if field == "date"));
    }

    #[test]
    fn test_read_bad_record_date_names_line() {
        let file = write_csv("pays;date\nfr;2020-01-15\nbe;not a date\n");
        let err = read(file.path(), "pays", "date", b';').unwrap_err();
        match err {
            SalesError::DateParse { value, context } => {
                assert_eq!(value, "not a date");
                assert_eq!(context, "line 3, field 'date'");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_day_first_export() {
        let file = write_csv("pays;date\nfr;01/02/2020\nbe;25/12/2020\n");
        let records =
            read_transactions(file.path(), "pays", "date", b';', DateOrder::DayFirst).unwrap();
        assert_eq!(records[0].date, d(2020, 2, 1));
        assert_eq!(records[1].date, d(2020, 12, 25));
    }

    #[test]
    fn test_read_out_of_range_year_is_date_error() {
        let file = write_csv("pays;date\nfr;+262142-06-01\n");
        let err = read(file.path(), "pays", "date", b';').unwrap_err();
        assert!(matches!(err, SalesError::DateParse { ref value, .. } if value == "+262142-06-01"));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.csv");
        let err = read(&path, "pays", "date", b';').unwrap_err();
        assert!(matches!(err, SalesError::SourceNotFound { .. }));
    }

    #[test]
    fn test_read_header_only_file_is_empty() {
        let file = write_csv("pays;date\n");
        let records = read(file.path(), "pays", "date", b';').unwrap();
        assert!(records.is_empty());
    }
}
