//! Dual-axis sales chart.
//!
//! The left axis carries the francophone and other-country shares (0–100 %).
//! The total sale count is drawn on the same canvas, rescaled so that the
//! busiest period touches the top, and a separate right-hand gutter shows
//! its real scale. A cursor highlights one period and a readout line under
//! the chart gives its exact values.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph},
    Frame,
};

use salesmix_core::formatting::{format_count, format_percent};

use crate::themes::Theme;
use crate::view::ReportView;

/// Width of the right-hand gutter holding the total-count axis.
const RIGHT_AXIS_WIDTH: u16 = 9;

/// Plot points for the three series of the chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub francophone: Vec<(f64, f64)>,
    pub other: Vec<(f64, f64)>,
    /// Totals rescaled onto the 0–100 axis.
    pub total_scaled: Vec<(f64, f64)>,
    /// Real value of the top of the secondary axis.
    pub max_total: u64,
}

impl ChartSeries {
    /// Build the series for `view`, one x step per period.
    pub fn from_view(view: &ReportView) -> Self {
        let max_total = view.max_total();
        let mut series = ChartSeries {
            max_total,
            ..Default::default()
        };
        for (i, (agg, pct)) in view.rows().enumerate() {
            let x = i as f64;
            series.francophone.push((x, pct.francophone_pct));
            series.other.push((x, pct.other_pct));
            let scaled = if max_total == 0 {
                0.0
            } else {
                100.0 * agg.total_count as f64 / max_total as f64
            };
            series.total_scaled.push((x, scaled));
        }
        series
    }

    /// Points of the three series at period `index`, for the cursor marker.
    pub fn points_at(&self, index: usize) -> Vec<(f64, f64)> {
        [&self.francophone, &self.other, &self.total_scaled]
            .iter()
            .filter_map(|series| series.get(index).copied())
            .collect()
    }

    /// Upper x bound; at least 1 so a single period still gets a canvas.
    pub fn x_max(&self) -> f64 {
        (self.francophone.len().saturating_sub(1)).max(1) as f64
    }
}

/// First, middle and last period labels for the x axis.
pub fn x_labels(labels: &[String]) -> Vec<String> {
    match labels.len() {
        0 => Vec::new(),
        1 | 2 => labels.to_vec(),
        n => vec![
            labels[0].clone(),
            labels[n / 2].clone(),
            labels[n - 1].clone(),
        ],
    }
}

/// Labels of the secondary (total count) axis, top to bottom.
pub fn total_axis_labels(max_total: u64) -> [String; 3] {
    [
        format_count(max_total),
        format_count(max_total / 2),
        "0".to_string(),
    ]
}

/// Exact values of the period at `index`, or `None` past the end.
pub fn readout(view: &ReportView, index: usize) -> Option<String> {
    let (agg, pct) = view.rows().nth(index)?;
    Some(format!(
        "{}  Francophone {} ({})  Other {} ({})  Total {}",
        agg.period.label(),
        format_percent(pct.francophone_pct),
        format_count(agg.francophone_count),
        format_percent(pct.other_pct),
        format_count(agg.other_count),
        format_count(agg.total_count),
    ))
}

/// Render the chart of `view` into `area` with the cursor on period `cursor`.
pub fn render_chart_view(
    frame: &mut Frame,
    area: Rect,
    view: &ReportView,
    cursor: usize,
    theme: &Theme,
) {
    let series = ChartSeries::from_view(view);
    let cursor = cursor.min(view.len().saturating_sub(1));
    let cursor_points = series.points_at(cursor);

    let [plot_area, readout_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
    let [chart_area, gutter] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(RIGHT_AXIS_WIDTH)])
            .areas(plot_area);

    let datasets = vec![
        Dataset::default()
            .name("Francophone (%)")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.series_francophone)
            .data(&series.francophone),
        Dataset::default()
            .name("Other (%)")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.series_other)
            .data(&series.other),
        Dataset::default()
            .name("Total sales (right axis)")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(theme.series_total)
            .data(&series.total_scaled),
        Dataset::default()
            .marker(symbols::Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(theme.value)
            .data(&cursor_points),
    ];

    let x_axis = Axis::default()
        .title(capitalize(view.granularity.as_str()))
        .style(theme.axis)
        .bounds([0.0, series.x_max()])
        .labels(x_labels(&view.labels()));

    let y_axis = Axis::default()
        .title("Share of sales (%)")
        .style(theme.axis)
        .bounds([0.0, 100.0])
        .labels(["0", "50", "100"]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", view.title())),
        )
        .x_axis(x_axis)
        .y_axis(y_axis)
        .legend_position(Some(LegendPosition::TopLeft));

    frame.render_widget(chart, chart_area);
    render_total_axis(frame, gutter, series.max_total, theme);

    if let Some(text) = readout(view, cursor) {
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" ▸ ", theme.label),
                Span::styled(text, theme.value),
            ])),
            readout_area,
        );
    }
}

/// Draw the secondary axis in the right gutter, aligned with the chart's
/// plotting area (one border row at the top, border plus x labels at the
/// bottom).
fn render_total_axis(frame: &mut Frame, area: Rect, max_total: u64, theme: &Theme) {
    let plot_height = area.height.saturating_sub(4);
    if plot_height < 3 {
        return;
    }
    let [top, mid, bottom] = total_axis_labels(max_total);

    let mut lines = vec![Line::from(Span::styled("Total", theme.series_total))];
    lines.push(Line::from(Span::styled(top, theme.series_total)));
    let gap = usize::from(plot_height.saturating_sub(3) / 2);
    lines.extend((0..gap).map(|_| Line::from("")));
    lines.push(Line::from(Span::styled(mid, theme.series_total)));
    let rest = usize::from(plot_height.saturating_sub(3)) - gap;
    lines.extend((0..rest).map(|_| Line::from("")));
    lines.push(Line::from(Span::styled(bottom, theme.series_total)));

    frame.render_widget(Paragraph::new(lines), area);
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render a placeholder when the report has no periods.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No sales to chart", theme.warning)),
        Line::from(""),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" salesmix ")),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
