use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Francophone vs. other-country sales shares over time
#[derive(Parser, Debug, Clone)]
#[command(
    name = "salesmix",
    about = "Francophone vs. other-country sales shares over time",
    version
)]
pub struct Settings {
    /// Sales export to analyse (CSV)
    pub file: PathBuf,

    /// Column holding the customer country code
    #[arg(long, default_value = "Customer country code")]
    pub country_field: String,

    /// Column holding the sale date
    #[arg(long, default_value = "Sale Date")]
    pub date_field: String,

    /// Time bucket: week (W), month (M), quarter (Q) or year (Y)
    #[arg(short, long, default_value = "month")]
    pub granularity: String,

    /// Ignore sales before this date (YYYY-MM-DD); all data when omitted
    #[arg(short, long)]
    pub start_date: Option<String>,

    /// Run the analysis once per granularity (week, month, quarter, year)
    #[arg(long)]
    pub all: bool,

    /// CSV field delimiter
    #[arg(long, default_value = ";", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Read ambiguous NN/NN/YYYY dates day first (default: month first)
    #[arg(long = "dayfirst")]
    pub day_first: bool,

    /// Output format for the printed report
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Open the interactive chart after printing the report
    #[arg(long)]
    pub chart: bool,

    /// Chart theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path (logs go to stderr when omitted)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// `true` when the report should be emitted as JSON.
    pub fn json_output(&self) -> bool {
        self.format == "json"
    }
}

/// Accept a single ASCII character (or `\t`) as the CSV delimiter.
fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(format!(
            "delimiter must be a single ASCII character, got '{}'",
            s
        )),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
