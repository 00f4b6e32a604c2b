//! Ratatui-based terminal UI.
//!
//! Shows one chart at a time with a header summarizing the run; ←/→ switch
//! between charts and `q` quits.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
};

use crate::app::pipeline::RunOutput;
use crate::error::AppError;
use crate::plot::ChartKind;

mod plotters_chart;

use plotters_chart::GoldPlottersChart;

/// Start the TUI over a computed run.
pub fn run(output: RunOutput) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(output);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    output: RunOutput,
    selected: ChartKind,
}

impl App {
    fn new(output: RunOutput) -> Self {
        Self {
            output,
            selected: ChartKind::Nominal,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the UI should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Right | KeyCode::Tab => self.selected = self.selected.next(),
            KeyCode::Left | KeyCode::BackTab => self.selected = self.selected.prev(),
            KeyCode::Char(c) => {
                if let Some(kind) = c
                    .to_digit(10)
                    .and_then(|d| (d as usize).checked_sub(1))
                    .and_then(|i| ChartKind::ALL.get(i))
                {
                    self.selected = *kind;
                }
            }
            _ => {}
        }
        false
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let analysis = &self.output.analysis;
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("gold", Style::default().fg(Color::Cyan)),
            Span::raw(" - real gold price (EUR, CPI-adjusted)"),
        ]));

        let span = analysis
            .span()
            .map(|(a, b)| format!("{a} .. {b}"))
            .unwrap_or_else(|| "-".to_string());
        lines.push(Line::from(Span::styled(
            format!("periods: {span} | months: {} | CAGR: {:.2}%", analysis.records.len(), analysis.cagr_pct()),
            Style::default().fg(Color::Gray),
        )));

        let titles: Vec<Line> = self
            .output
            .charts
            .iter()
            .enumerate()
            .map(|(i, c)| Line::from(format!("{} {}", i + 1, c.y_label)))
            .collect();
        let selected = ChartKind::ALL.iter().position(|&k| k == self.selected).unwrap_or(0);
        let tabs = Tabs::new(titles)
            .select(selected)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD));

        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(1)])
            .split(inner);
        frame.render_widget(Paragraph::new(Text::from(lines)), rows[0]);
        frame.render_widget(tabs, rows[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(spec) = self.output.charts.iter().find(|c| c.kind == self.selected) else {
            return;
        };

        let block = Block::default().title(spec.title.as_str()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);
        frame.render_widget(GoldPlottersChart { spec }, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ switch chart  1-5 jump  q quit";
        let p = Paragraph::new(Line::from(Span::styled(help, Style::default().fg(Color::Gray))))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Analysis;

    fn app() -> App {
        let analysis = Analysis { records: Vec::new(), yearly: Vec::new(), cagr: 0.0 };
        let charts = crate::plot::build_all(&analysis);
        App::new(RunOutput { gold: Vec::new(), cpi: Vec::new(), analysis, charts })
    }

    #[test]
    fn arrow_keys_cycle_charts() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Left));
        assert_eq!(app.selected, ChartKind::CagrPerYear);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.selected, ChartKind::Nominal);
    }

    #[test]
    fn digits_jump_and_q_quits() {
        let mut app = app();
        app.handle_key(KeyCode::Char('3'));
        assert_eq!(app.selected, ChartKind::CumulativeReal);
        app.handle_key(KeyCode::Char('9'));
        assert_eq!(app.selected, ChartKind::CumulativeReal);
        assert!(app.handle_key(KeyCode::Char('q')));
    }
}
