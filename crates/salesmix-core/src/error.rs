use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the sales analysis pipeline.
///
/// Every variant is terminal for the current run: nothing is retried and no
/// partial report is returned.
#[derive(Error, Debug)]
pub enum SalesError {
    /// The input file does not exist.
    #[error("Source file not found: {path}")]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input file exists but could not be read as CSV.
    #[error("Failed to read {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A configured field name is absent from the CSV header.
    #[error("Field '{field}' not found; available fields: {}", format_fields(.available))]
    MissingField {
        field: String,
        available: Vec<String>,
    },

    /// A cutoff or record date could not be parsed.
    #[error("Invalid date '{value}' ({context}); expected format YYYY-MM-DD")]
    DateParse { value: String, context: String },

    /// A granularity string is not one of week, month, quarter, year.
    #[error("Unsupported granularity '{0}'; use week (W), month (M), quarter (Q) or year (Y)")]
    UnsupportedGranularity(String),

    /// No record survived the start-date filter.
    #[error("{}", empty_result_message(.start))]
    EmptyResult { start: Option<chrono::NaiveDate> },
}

/// Convenience alias used throughout the salesmix crates.
pub type Result<T> = std::result::Result<T, SalesError>;

fn format_fields(fields: &[String]) -> String {
    let quoted: Vec<String> = fields.iter().map(|f| format!("'{}'", f)).collect();
    format!("[{}]", quoted.join(", "))
}

fn empty_result_message(start: &Option<chrono::NaiveDate>) -> String {
    match start {
        Some(date) => format!("No data found on or after {}", date.format("%Y-%m-%d")),
        None => "No data found in source".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_error_display_source_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = SalesError::SourceNotFound {
            path: PathBuf::from("/data/ventes.csv"),
            source: io_err,
        };
        assert_eq!(err.to_string(), "Source file not found: /data/ventes.csv");
    }

    #[test]
    fn test_error_display_missing_field_lists_available() {
        let err = SalesError::MissingField {
            field: "pays".to_string(),
            available: vec!["Ref".to_string(), "Sale Date".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Field 'pays' not found; available fields: ['Ref', 'Sale Date']"
        );
    }

    #[test]
    fn test_error_display_date_parse() {
        let err = SalesError::DateParse {
            value: "2020-13-45".to_string(),
            context: "start date".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid date '2020-13-45' (start date); expected format YYYY-MM-DD"
        );
    }

    #[test]
    fn test_error_display_unsupported_granularity() {
        let err = SalesError::UnsupportedGranularity("D".to_string());
        assert!(err.to_string().starts_with("Unsupported granularity 'D'"));
    }

    #[test]
    fn test_error_display_empty_result() {
        let err = SalesError::EmptyResult {
            start: NaiveDate::from_ymd_opt(2030, 1, 1),
        };
        assert_eq!(err.to_string(), "No data found on or after 2030-01-01");

        let err = SalesError::EmptyResult { start: None };
        assert_eq!(err.to_string(), "No data found in source");
    }
}
