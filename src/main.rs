use std::io;
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use esoccer_terminal::config::AppConfig;
use esoccer_terminal::feed::spawn_provider;
use esoccer_terminal::logging;
use esoccer_terminal::record::StatKey;
use esoccer_terminal::report;
use esoccer_terminal::source::Source;
use esoccer_terminal::state::{apply_delta, AppState, Delta, ProviderCommand, Threshold, View};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
    report_dir: std::path::PathBuf,
}

impl App {
    fn new(state: AppState, cmd_tx: mpsc::Sender<ProviderCommand>, report_dir: std::path::PathBuf) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
            report_dir,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('r') => self.send(ProviderCommand::Refresh, "Refresh"),
            KeyCode::Char('v') => self.state.toggle_view(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('a') => self.state.adjust_threshold(Threshold::Attacks, -1),
            KeyCode::Char('A') => self.state.adjust_threshold(Threshold::Attacks, 1),
            KeyCode::Char('p') => self.state.adjust_threshold(Threshold::Possession, -1),
            KeyCode::Char('P') => self.state.adjust_threshold(Threshold::Possession, 1),
            KeyCode::Char('s') => self.state.toggle_strict(),
            KeyCode::Char('-') => self.change_interval(-1),
            KeyCode::Char('+') | KeyCode::Char('=') => self.change_interval(1),
            KeyCode::Char('e') => self.export_report(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn send(&mut self, cmd: ProviderCommand, what: &str) {
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log(format!("[WARN] {what} request failed"));
        }
    }

    fn change_interval(&mut self, step: i64) {
        let minutes = self.state.adjust_refresh(step);
        self.send(ProviderCommand::SetInterval { minutes }, "Interval change");
    }

    fn export_report(&mut self) {
        let now = Local::now();
        let html = report::render_html(&self.state.batch, &self.state.config, now);
        match report::write_report(&self.report_dir, &html, now) {
            Ok(path) => {
                self.state
                    .push_log(format!("[INFO] Report saved to {}", path.display()));
                match report::write_download_link(&path, &html) {
                    Ok(link) => self
                        .state
                        .push_log(format!("[INFO] Download link saved to {}", link.display())),
                    Err(err) => self
                        .state
                        .push_log(format!("[WARN] Download link failed: {err:#}")),
                }
            }
            Err(err) => self.state.push_log(format!("[WARN] Report export failed: {err:#}")),
        }
    }
}

fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = config.log_file.as_ref() {
        if let Err(err) = logging::init_file(path) {
            eprintln!("warning: {err:#}");
        }
    }
    let source = match Source::from_config(&config) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(config, source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: AppConfig, source: Source) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(source, config.refresh_minutes, tx, cmd_rx);

    let mut state = AppState::new(config.classifier, config.refresh_minutes);
    state.source_label = config.source.label().to_string();
    state.push_log(format!(
        "[INFO] Source: {}, refresh every {} min",
        state.source_label, state.refresh_minutes
    ));
    let mut app = App::new(state, cmd_tx, config.report_dir.clone());
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    res
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_records(frame, chunks[1], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().title("Console").borders(Borders::TOP));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text());
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let refreshed = state
        .last_refresh
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    let status = if state.loading { " | loading..." } else { "" };
    let line1 = format!(
        "ESOCCER PULSE | {} | {} | every {} min | last {}{}",
        state.source_label,
        view_label(state.view),
        state.refresh_minutes,
        refreshed,
        status
    );
    let line2 = format!(
        "Attacks >= {} | Possession >= {} | {} | {} rows, {} matched",
        state.config.delta_attacks,
        state.config.delta_possession,
        state.config.mode_label(),
        state.batch.all().len(),
        state.batch.matched_count()
    );
    format!("{line1}\n{line2}")
}

fn footer_text() -> &'static str {
    "r Refresh | v All/Matched | j/k Move | a/A p/P Deltas | s Strict B | -/+ Interval | e Export | ? Help | q Quit"
}

fn view_label(view: View) -> &'static str {
    match view {
        View::All => "All matches",
        View::Matched => "Pattern only",
    }
}

fn record_columns() -> [Constraint; 15] {
    [
        Constraint::Min(14),
        Constraint::Min(14),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(8),
    ]
}

fn render_records(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = record_columns();
    render_records_header(frame, sections[0], &widths);

    let list_area = sections[1];
    let rows = state.visible_rows();
    if rows.is_empty() {
        let msg = if state.loading && state.last_refresh.is_none() {
            "Loading matches..."
        } else if state.view == View::Matched && !state.batch.is_empty() {
            "No match meets the pattern right now."
        } else {
            "No matches available right now."
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }
    if list_area.height == 0 {
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, rows.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let row = rows[idx];
        let selected = idx == state.selected;
        let mut row_style = if row.pattern_matched {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        if selected {
            row_style = row_style.bg(Color::DarkGray);
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        render_cell_text(frame, cols[0], &row.record.team_a, row_style);
        render_cell_text(frame, cols[1], &row.record.team_b, row_style);
        for (offset, key) in StatKey::ALL.into_iter().enumerate() {
            render_cell_text(
                frame,
                cols[2 + offset],
                &row.record.stat(key).to_string(),
                row_style,
            );
        }
        render_cell_text(frame, cols[12], flag(row.verdict.dominance_a), row_style);
        render_cell_text(frame, cols[13], flag(row.verdict.dominance_b), row_style);
        let pattern = if row.pattern_matched { "MATCH" } else { "-" };
        render_cell_text(frame, cols[14], pattern, row_style);
    }
}

fn render_records_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "Team A", style);
    render_cell_text(frame, cols[1], "Team B", style);
    for (offset, key) in StatKey::ALL.into_iter().enumerate() {
        render_cell_text(frame, cols[2 + offset], key.column_label(), style);
    }
    render_cell_text(frame, cols[12], "A", style);
    render_cell_text(frame, cols[13], "B", style);
    render_cell_text(frame, cols[14], "Pattern", style);
}

fn flag(value: bool) -> &'static str {
    if value { "y" } else { "." }
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(text.to_string()).style(style);
    frame.render_widget(paragraph, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(4)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "eSoccer Pulse - Help",
        "",
        "Data:",
        "  r            Refresh now",
        "  - / +        Refresh interval (1-30 min)",
        "  e            Export HTML report",
        "",
        "Pattern:",
        "  a / A        Delta attacks down/up",
        "  p / P        Delta possession down/up",
        "  s            Team B must lead shots AND shots on goal",
        "",
        "View:",
        "  v            All matches / pattern only",
        "  j/k or ↑/↓   Move",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
