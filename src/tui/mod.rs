//! Ratatui-based terminal UI.
//!
//! Three panes share one `Calculator`:
//! - calculator: type a weight, Enter to get the portion
//! - table: browse and edit the calibration points (every edit refits)
//! - chart: calibration points and the fitted daily curve
//!
//! Edits live in memory until `s` writes the table back to disk.

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
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::{Calculator, query};
use crate::config::Config;
use crate::domain::{CalibrationPoint, Model};
use crate::error::{AppError, EXIT_INTERNAL, FitError};
use crate::models::evaluate;

mod plotters_chart;

use plotters_chart::PortionChart;

/// Start the TUI.
pub fn run(config: Config) -> Result<(), AppError> {
    let calc = crate::app::load_calculator(&config)?;
    let mut app = App::new(calc, config);

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                EXIT_INTERNAL,
                format!("Failed to enter alternate screen: {e}"),
            ));
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Calculator,
    Table,
}

/// Two-field editor for one table row.
#[derive(Debug, Clone, PartialEq)]
struct RowEditor {
    index: usize,
    weight: String,
    daily: String,
    on_daily: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Modal {
    None,
    Edit(RowEditor),
    LoadPath(String),
}

struct App {
    calc: Calculator,
    config: Config,
    focus: Focus,
    weight_input: String,
    result: String,
    last_query: Option<f64>,
    selected: usize,
    modal: Modal,
    dirty: bool,
    quit_armed: bool,
    status: String,
}

impl App {
    fn new(calc: Calculator, config: Config) -> Self {
        let status = match calc.model() {
            Some(_) => format!("Loaded {} rows.", calc.table().len()),
            None => "Model not trained.".to_string(),
        };
        Self {
            calc,
            config,
            focus: Focus::Calculator,
            weight_input: String::new(),
            result: "Enter a weight to calculate.".to_string(),
            last_query: None,
            selected: 0,
            modal: Modal::None,
            dirty: false,
            quit_armed: false,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_INTERNAL, format!("Event read error: {e}")))? {
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

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match std::mem::replace(&mut self.modal, Modal::None) {
            Modal::Edit(editor) => {
                self.modal = self.handle_editor_key(editor, code);
                return false;
            }
            Modal::LoadPath(path) => {
                self.modal = self.handle_load_key(path, code);
                return false;
            }
            Modal::None => {}
        }

        if code != KeyCode::Char('q') {
            self.quit_armed = false;
        }

        match code {
            KeyCode::Char('q') => return self.request_quit(),
            KeyCode::Esc => return self.request_quit(),
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Calculator => Focus::Table,
                    Focus::Table => Focus::Calculator,
                };
            }
            _ => match self.focus {
                Focus::Calculator => self.handle_calculator_key(code),
                Focus::Table => self.handle_table_key(code),
            },
        }
        false
    }

    fn request_quit(&mut self) -> bool {
        if !self.dirty || self.quit_armed {
            return true;
        }
        self.quit_armed = true;
        self.status = "Unsaved changes: s to save, q again to quit.".to_string();
        false
    }

    fn handle_calculator_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => self.weight_input.push(c),
            KeyCode::Backspace => {
                self.weight_input.pop();
            }
            KeyCode::Enter => self.calculate(),
            _ => {}
        }
    }

    fn calculate(&mut self) {
        let weight = match query::parse_weight(&self.weight_input) {
            Ok(w) => w,
            Err(msg) => {
                self.result = msg;
                return;
            }
        };
        self.last_query = Some(weight);
        self.result = match self.calc.try_predict(weight) {
            Ok(portion) => crate::report::format_portion(weight, portion),
            Err(err) => err.to_string(),
        };
    }

    fn handle_table_key(&mut self, code: KeyCode) {
        let len = self.calc.table().len();
        match code {
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyCode::Char('a') => {
                if let Ok((idx, refit)) = self.calc.edit_table(|t| Ok(t.add_blank())) {
                    self.selected = idx;
                    self.after_edit(format!("Added row {idx}."), refit);
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(p) = self.calc.table().get(self.selected) {
                    self.modal = Modal::Edit(RowEditor {
                        index: self.selected,
                        weight: format!("{:.2}", p.weight_kg),
                        daily: format!("{:.2}", p.daily_gr),
                        on_daily: false,
                    });
                    self.status = "Editing row: Tab switch field, Enter apply, Esc cancel.".to_string();
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                let index = self.selected;
                match self.calc.edit_table(|t| t.delete(index)) {
                    Ok((_, refit)) => {
                        self.selected = self.selected.min(len.saturating_sub(2));
                        self.after_edit(format!("Deleted row {index}."), refit);
                    }
                    Err(err) => self.status = err.to_string(),
                }
            }
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('l') => {
                self.modal = Modal::LoadPath(String::new());
                self.status = "Load JSON: type a file path, Enter to load, Esc to cancel.".to_string();
            }
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, mut editor: RowEditor, code: KeyCode) -> Modal {
        match code {
            KeyCode::Esc => {
                self.status = "Edit canceled.".to_string();
                return Modal::None;
            }
            KeyCode::Tab => editor.on_daily = !editor.on_daily,
            KeyCode::Backspace => {
                field(&mut editor).pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => field(&mut editor).push(c),
            KeyCode::Enter => {
                let Ok(weight_kg) = editor.weight.trim().parse::<f64>() else {
                    self.status = format!("Invalid weight value: {}", editor.weight);
                    return Modal::Edit(editor);
                };
                let Ok(daily_gr) = editor.daily.trim().parse::<f64>() else {
                    self.status = format!("Invalid daily grams value: {}", editor.daily);
                    return Modal::Edit(editor);
                };
                let index = editor.index;
                let point = CalibrationPoint { weight_kg, daily_gr };
                return match self.calc.edit_table(|t| t.edit(index, point)) {
                    Ok(((), refit)) => {
                        self.after_edit(format!("Updated row {index}."), refit);
                        Modal::None
                    }
                    Err(err) => {
                        self.status = err.to_string();
                        Modal::Edit(editor)
                    }
                };
            }
            _ => {}
        }
        Modal::Edit(editor)
    }

    fn handle_load_key(&mut self, mut path: String, code: KeyCode) -> Modal {
        match code {
            KeyCode::Esc => {
                self.status = "Load canceled.".to_string();
                Modal::None
            }
            KeyCode::Backspace => {
                path.pop();
                Modal::LoadPath(path)
            }
            KeyCode::Char(c) => {
                path.push(c);
                Modal::LoadPath(path)
            }
            KeyCode::Enter => match crate::io::read_table(std::path::Path::new(path.trim())) {
                Ok(table) => {
                    let rows = table.len();
                    let refit = self.calc.replace_table(table);
                    self.selected = 0;
                    self.after_edit(format!("Loaded {rows} rows from {}.", path.trim()), refit);
                    Modal::None
                }
                Err(err) => {
                    self.status = err.to_string();
                    Modal::LoadPath(path)
                }
            },
            _ => Modal::LoadPath(path),
        }
    }

    fn after_edit(&mut self, message: String, refit: Result<Model, FitError>) {
        self.dirty = true;
        self.status = match refit {
            Ok(_) => message,
            Err(err) => format!("{message} {err}"),
        };
        if self.last_query.is_some() {
            self.calculate();
        }
    }

    fn save(&mut self) {
        match crate::io::save_table(&self.config.data_path, &self.calc.table()) {
            Ok(()) => {
                self.dirty = false;
                self.status = format!("Saved to {}.", self.config.data_path.display());
            }
            Err(err) => self.status = format!("Error saving data: {err}"),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.modal {
            Modal::Edit(editor) => draw_editor(frame, size, editor),
            Modal::LoadPath(path) => draw_load(frame, size, path),
            Modal::None => {}
        }
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let model = match self.calc.quality() {
            Some(q) => format!(
                "cubic fit | n={} | rmse={:.2}g{}",
                q.n,
                q.rmse,
                if self.dirty { " | unsaved" } else { "" }
            ),
            None => "model not trained".to_string(),
        };
        let line = Line::from(vec![
            Span::styled("fedo", Style::default().fg(Color::Cyan)),
            Span::raw(" - dog food portion calculator | "),
            Span::styled(model, Style::default().fg(Color::Gray)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(44), Constraint::Min(0)])
            .split(area);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0)])
            .split(columns[0]);

        self.draw_calculator(frame, left[0]);
        self.draw_table(frame, left[1]);
        self.draw_chart(frame, columns[1]);
    }

    fn draw_calculator(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let focused = self.focus == Focus::Calculator;
        let input = if self.weight_input.is_empty() && !focused {
            Span::styled("Enter dog's weight in kg...", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(format!("{}{}", self.weight_input, if focused { "_" } else { "" }))
        };
        let text = Text::from(vec![
            Line::from(vec![Span::raw("Weight (kg): "), input]),
            Line::from(""),
            Line::from(Span::styled(&self.result, Style::default().fg(Color::Green))),
        ]);
        let p = Paragraph::new(text)
            .wrap(ratatui::widgets::Wrap { trim: true })
            .block(focus_block("Calculator", focused));
        frame.render_widget(p, area);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let table = self.calc.table();
        let items: Vec<ListItem> = table
            .points()
            .iter()
            .enumerate()
            .map(|(i, p)| ListItem::new(format!("{i:>3}  {:>8.2} kg  {:>8.2} g", p.weight_kg, p.daily_gr)))
            .collect();

        let list = List::new(items)
            .block(focus_block("Feeding data", self.focus == Focus::Table))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        if self.focus == Focus::Table && !table.is_empty() {
            state.select(Some(self.selected.min(table.len() - 1)));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Daily amount").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(model) = self.calc.model() else {
            let msg = Paragraph::new("Model not trained.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let series = chart_series(&model, self.calc.table().points(), self.last_query);
        let widget = PortionChart {
            curve: &series.curve,
            points: &series.points,
            query: series.query,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            x_label: "weight (kg)",
            y_label: "daily (g)",
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.focus {
            Focus::Calculator => "Tab table  Enter calculate  q quit",
            Focus::Table => "Tab calc  ↑/↓ select  a add  e edit  x delete  l load  s save  q quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn field(editor: &mut RowEditor) -> &mut String {
    if editor.on_daily {
        &mut editor.daily
    } else {
        &mut editor.weight
    }
}

fn focus_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Block::default().title(title).borders(Borders::ALL).border_style(style)
}

fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_editor(frame: &mut ratatui::Frame<'_>, area: Rect, editor: &RowEditor) {
    let rect = popup_rect(area, 40, 6);
    let active = Style::default().fg(Color::Black).bg(Color::White);
    let (w_style, d_style) = if editor.on_daily {
        (Style::default(), active)
    } else {
        (active, Style::default())
    };
    let text = Text::from(vec![
        Line::from(vec![Span::raw("Weight (kg): "), Span::styled(&editor.weight, w_style)]),
        Line::from(vec![Span::raw("Daily (g):   "), Span::styled(&editor.daily, d_style)]),
    ]);
    let p = Paragraph::new(text).block(
        Block::default()
            .title(format!("Edit row {}", editor.index))
            .borders(Borders::ALL),
    );
    frame.render_widget(Clear, rect);
    frame.render_widget(p, rect);
}

fn draw_load(frame: &mut ratatui::Frame<'_>, area: Rect, path: &str) {
    let rect = popup_rect(area, 60, 3);
    let p = Paragraph::new(format!("{path}_"))
        .block(Block::default().title("Load feeding data from JSON").borders(Borders::ALL));
    frame.render_widget(Clear, rect);
    frame.render_widget(p, rect);
}

/// Data prepared for one chart render.
#[derive(Debug, Clone)]
struct ChartSeries {
    curve: Vec<(f64, f64)>,
    points: Vec<(f64, f64)>,
    query: Option<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Sample the fitted daily curve across the calibration range (and the last query).
fn chart_series(model: &Model, points: &[CalibrationPoint], query: Option<f64>) -> ChartSeries {
    let mut x0 = 0.0_f64;
    let mut x1 = points.iter().map(|p| p.weight_kg).fold(0.0_f64, f64::max);
    if let Some(w) = query {
        x1 = x1.max(w);
    }
    if !x1.is_finite() || x1 <= x0 {
        x0 = 0.0;
        x1 = 100.0;
    }

    let n = 200usize;
    let curve: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let x = x0 + u * (x1 - x0);
            (x, evaluate(model.coefficients(), x))
        })
        .collect();
    let pts: Vec<(f64, f64)> = points.iter().map(|p| (p.weight_kg, p.daily_gr)).collect();
    let query = query.map(|w| (w, evaluate(model.coefficients(), w)));

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in curve.iter().chain(pts.iter()) {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = 1.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

    ChartSeries {
        curve,
        points: pts,
        query,
        x_bounds: [x0, x1],
        y_bounds: [y_min - pad, y_max + pad],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_table;

    fn app_in(dir: &tempfile::TempDir) -> App {
        let config = Config {
            data_path: dir.path().join("feeding_data.json"),
        };
        App::new(Calculator::new(default_table()), config)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn calculator_reports_portion_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);

        type_str(&mut app, "20");
        app.handle_key(KeyCode::Enter);
        assert!(app.result.starts_with("For a dog weighing 20.00 kg"), "{}", app.result);

        app.weight_input = "150".to_string();
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.result, "Weight must be greater than 0 and less than 100 kg.");
    }

    #[test]
    fn table_edit_then_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);

        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Char('e'));
        assert!(matches!(app.modal, Modal::Edit(_)));
        // Replace the weight field with 1.5.
        for _ in 0..8 {
            app.handle_key(KeyCode::Backspace);
        }
        type_str(&mut app, "1.5");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.modal, Modal::None);
        assert_eq!(app.calc.table().get(0).unwrap().weight_kg, 1.5);
        assert!(app.dirty);

        app.handle_key(KeyCode::Char('s'));
        assert!(!app.dirty);
        let saved = crate::io::read_table(&app.config.data_path).unwrap();
        assert_eq!(saved, app.calc.table());
    }

    #[test]
    fn quit_with_unsaved_changes_needs_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Char('a'));
        assert_eq!(app.calc.table().len(), 13);
        assert!(!app.handle_key(KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn delete_respects_minimum_rows() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_path: dir.path().join("feeding_data.json"),
        };
        let table = crate::domain::CalibrationTable::new(default_table().points()[..3].to_vec()).unwrap();
        let mut app = App::new(Calculator::new(table), config);
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Char('x'));
        assert_eq!(app.calc.table().len(), 3);
        assert_eq!(app.status, "Cannot delete: minimum 3 records required");
    }

    #[test]
    fn chart_series_covers_query() {
        let model = Model::new([0.0, 2.0, 0.0, 0.0]);
        let table = default_table();
        let series = chart_series(&model, table.points(), Some(90.0));
        assert_eq!(series.x_bounds, [0.0, 90.0]);
        assert_eq!(series.query, Some((90.0, 180.0)));
        assert!(series.y_bounds[0] < 0.0 && series.y_bounds[1] > 666.0);
    }
}
