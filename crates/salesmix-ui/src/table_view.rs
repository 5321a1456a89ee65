//! Period table for the chart TUI.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per period
//! (counts and shares side by side) plus a highlighted totals row.

use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use salesmix_core::formatting::{format_count, format_percent};

use crate::themes::Theme;
use crate::view::ReportView;

const HEADERS: [&str; 6] = [
    "Period",
    "Other",
    "Francophone",
    "Total",
    "Other %",
    "Francophone %",
];

/// Cell texts of one table row.
pub fn row_cells(view: &ReportView) -> Vec<[String; 6]> {
    view.rows()
        .map(|(agg, pct)| {
            [
                agg.period.label(),
                format_count(agg.other_count),
                format_count(agg.francophone_count),
                format_count(agg.total_count),
                format_percent(pct.other_pct),
                format_percent(pct.francophone_pct),
            ]
        })
        .collect()
}

/// Cell texts of the totals row.
pub fn total_cells(view: &ReportView) -> [String; 6] {
    let totals = view.totals;
    let pct = |share: Option<f64>| share.map(format_percent).unwrap_or_else(|| "-".to_string());
    [
        "TOTAL".to_string(),
        format_count(totals.other_count),
        format_count(totals.francophone_count),
        format_count(totals.total_count),
        pct(totals.other_pct()),
        pct(totals.francophone_pct()),
    ]
}

/// Render the period table of `view` into `area`.
pub fn render_table_view(frame: &mut Frame, area: Rect, view: &ReportView, theme: &Theme) {
    let header = Row::new(
        HEADERS
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let mut rows: Vec<Row> = row_cells(view)
        .into_iter()
        .enumerate()
        .map(|(i, cells)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(cells).style(style)
        })
        .collect();

    rows.push(Row::new(total_cells(view)).style(theme.table_total));

    let widths = [
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", view.title())),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
