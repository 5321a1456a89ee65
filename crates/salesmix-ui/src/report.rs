//! Plain-text report printed to stdout after an analysis run.
//!
//! Produces a summary block followed by two tables (percent shares and
//! absolute counts), one row per period.

use std::fmt::Write as _;

use salesmix_core::formatting::{format_count, format_percent};
use unicode_width::UnicodeWidthStr;

use crate::view::ReportView;

const RULE_WIDTH: usize = 50;
const HEADERS: [&str; 4] = ["Period", "Other", "Francophone", "Total"];

/// Render the full text report for `view`.
pub fn render_report(view: &ReportView) -> String {
    let mut out = String::new();
    out.push_str(&render_summary(view));
    out.push('\n');

    let _ = writeln!(out, "Detail per {} (percent):", view.granularity);
    let pct_rows: Vec<[String; 4]> = view
        .rows()
        .map(|(agg, pct)| {
            [
                agg.period.label(),
                format_percent(pct.other_pct),
                format_percent(pct.francophone_pct),
                format_percent(pct.total_pct),
            ]
        })
        .collect();
    out.push_str(&render_table(&pct_rows));
    out.push('\n');

    let _ = writeln!(out, "Detail per {} (counts):", view.granularity);
    let count_rows: Vec<[String; 4]> = view
        .rows()
        .map(|(agg, _)| {
            [
                agg.period.label(),
                format_count(agg.other_count),
                format_count(agg.francophone_count),
                format_count(agg.total_count),
            ]
        })
        .collect();
    out.push_str(&render_table(&count_rows));
    out
}

/// Render the summary block: grand totals and overall shares.
pub fn render_summary(view: &ReportView) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let totals = view.totals;
    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "SALES SUMMARY");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "Francophone countries: {}",
        format_count(totals.francophone_count)
    );
    let _ = writeln!(out, "Other countries:       {}", format_count(totals.other_count));
    let _ = writeln!(out, "Total:                 {}", format_count(totals.total_count));
    if let (Some(fr), Some(other)) = (totals.francophone_pct(), totals.other_pct()) {
        let _ = writeln!(out, "Francophone share:     {}", format_percent(fr));
        let _ = writeln!(out, "Other share:           {}", format_percent(other));
    }
    out
}

/// Banner printed before each granularity in multi-granularity mode.
pub fn render_banner(title: &str) -> String {
    let rule = "=".repeat(60);
    format!("{rule}\n{}\n{rule}\n", title.to_uppercase())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Left-align the period column, right-align the numeric columns.
fn render_table(rows: &[[String; 4]]) -> String {
    let mut widths = HEADERS.map(|h| h.width());
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width());
        }
    }

    let mut out = String::new();
    let header = HEADERS.map(str::to_string);
    push_row(&mut out, &header, &widths);
    let total_width = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
    let _ = writeln!(out, "{}", "-".repeat(total_width));
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str(" | ");
        }
        let pad = " ".repeat(width.saturating_sub(cell.width()));
        if i == 0 {
            line.push_str(cell);
            line.push_str(&pad);
        } else {
            line.push_str(&pad);
            line.push_str(cell);
        }
    }
    let _ = writeln!(out, "{}", line.trim_end());
}

// ── Tests ──────────────────────────────────────────────────────────────────────
