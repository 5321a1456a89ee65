//! Interactive chart viewer.
//!
//! [`App`] owns the theme and the current view mode and drives a blocking
//! crossterm event loop until the user quits.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};

use crate::chart_view;
use crate::table_view;
use crate::themes::Theme;
use crate::view::ReportView;

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which body the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Chart,
    Table,
}

impl ViewMode {
    fn toggled(self) -> Self {
        match self {
            ViewMode::Chart => ViewMode::Table,
            ViewMode::Table => ViewMode::Chart,
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root state of the chart viewer.
pub struct App {
    pub theme: Theme,
    pub view_mode: ViewMode,
    /// Period highlighted on the chart.
    pub cursor: usize,
    /// Source file name shown in the header.
    pub source: String,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, source: impl Into<String>) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            view_mode: ViewMode::Chart,
            cursor: 0,
            source: source.into(),
            should_quit: false,
        }
    }

    /// Show `view` until `q`, `Esc` or `Ctrl+C`; `t` switches between the
    /// chart and the table, arrow keys move the chart cursor.
    pub fn run(mut self, view: &ReportView) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame, view)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key, view.len()),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Apply one key press to the application state. `periods` bounds the
    /// cursor.
    pub fn handle_key(&mut self, key: KeyEvent, periods: usize) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('t') | KeyCode::Char('T') | KeyCode::Tab => {
                self.view_mode = self.view_mode.toggled();
            }
            KeyCode::Left | KeyCode::Char('h') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right | KeyCode::Char('l') => {
                self.cursor = (self.cursor + 1).min(periods.saturating_sub(1));
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = periods.saturating_sub(1),
            _ => {}
        }
    }

    /// Render header, body and key help into `frame`.
    pub fn render(&self, frame: &mut Frame, view: &ReportView) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let header_line = Line::from(vec![
            Span::styled(" salesmix ", self.theme.header),
            Span::styled("│ ", self.theme.separator),
            Span::styled(self.source.clone(), self.theme.value),
            Span::styled(
                format!(" │ {} periods", view.len()),
                self.theme.label,
            ),
        ]);
        frame.render_widget(Paragraph::new(header_line), header);

        if view.is_empty() {
            chart_view::render_no_data(frame, body, &self.theme);
        } else {
            match self.view_mode {
                ViewMode::Chart => {
                    chart_view::render_chart_view(frame, body, view, self.cursor, &self.theme)
                }
                ViewMode::Table => table_view::render_table_view(frame, body, view, &self.theme),
            }
        }

        let help = match self.view_mode {
            ViewMode::Chart => " ←/→: period  t: table  q: quit",
            ViewMode::Table => " t: chart  q: quit",
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(help, self.theme.dim))),
            footer,
        );
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
