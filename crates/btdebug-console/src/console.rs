//! Interactive debugger console.
//!
//! Each tick the console takes the latest snapshot, reconciles local UI
//! state against it, redraws everything, and then polls the keyboard.
//! Sidebar activations become backend commands; nothing is applied locally
//! except category expansion.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use btdebug_protocol::{Command, Snapshot};

use crate::config::UiConfig;
use crate::link::{BackendChannels, LinkStatus};
use crate::state::UiState;
use crate::view::draw_window;

/// Console log entries kept in memory.
const MAX_CONSOLE_MESSAGES: usize = 200;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// The debugger console state.
pub struct DebugConsole {
    backend: BackendChannels,
    ui: UiState,
    scroll_step: u16,
    /// Link status seen on the previous tick, for change messages.
    last_status: Option<LinkStatus>,
    /// Messages displayed in the console output area.
    console_messages: Vec<(chrono::DateTime<chrono::Utc>, String, Color)>,
}

impl DebugConsole {
    pub fn new(backend: BackendChannels, config: &UiConfig) -> Self {
        let mut console = Self {
            backend,
            ui: UiState::new(),
            scroll_step: config.scroll_step.max(1),
            last_status: None,
            console_messages: Vec::new(),
        };
        console.add_message(
            "Up/Down to move, Enter to activate, PgUp/PgDn scroll the tree, [/] the blackboard, q to quit.",
            Color::DarkGray,
        );
        console
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.console_messages.iter().map(|(_, msg, _)| msg.as_str())
    }

    /// Take the latest snapshot and bring local state in line with it.
    pub fn refresh(&mut self) -> Arc<Snapshot> {
        let snapshot = Arc::clone(&self.backend.snapshots.borrow());
        self.ui.reconcile(&snapshot);

        let status = self.backend.status.borrow().clone();
        if self.last_status.as_ref() != Some(&status) {
            let (text, color) = describe_status(&status);
            self.add_message(&format!("Link: {}", text), color);
            self.last_status = Some(status);
        }

        snapshot
    }

    /// Handle a key press against the snapshot currently on screen.
    pub fn handle_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        snapshot: &Snapshot,
    ) -> KeyOutcome {
        match (code, modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return KeyOutcome::Quit,
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => return KeyOutcome::Quit,
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => self.ui.cursor_up(),
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => self.ui.cursor_down(snapshot),
            (KeyCode::Enter, _) | (KeyCode::Char(' '), _) => {
                if let Some(command) = self.ui.activate(snapshot) {
                    self.issue(command);
                }
            }
            (KeyCode::PageUp, _) => self.ui.scroll_tree_up(self.scroll_step),
            (KeyCode::PageDown, _) => self.ui.scroll_tree_down(self.scroll_step),
            (KeyCode::Char('['), _) => self.ui.scroll_blackboard_up(self.scroll_step),
            (KeyCode::Char(']'), _) => self.ui.scroll_blackboard_down(self.scroll_step),
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn issue(&mut self, command: Command) {
        let text = match &command {
            Command::SpawnMob { path } => format!("→ {} {}", command.action(), path),
            other => format!("→ {}", other.action()),
        };
        tracing::info!(action = command.action(), "Issuing command");
        self.backend.commands.send(command);
        self.add_message(&text, Color::Cyan);
    }

    fn add_message(&mut self, msg: &str, color: Color) {
        if self.console_messages.len() >= MAX_CONSOLE_MESSAGES {
            self.console_messages.remove(0);
        }
        self.console_messages
            .push((chrono::Utc::now(), msg.to_string(), color));
    }

    /// Render the full console frame.
    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(10),   // Debug window
                Constraint::Length(6), // Console output
            ])
            .split(frame.area());

        self.render_status_bar(frame, outer[0], snapshot);
        draw_window(frame, outer[1], snapshot, &self.ui);
        self.render_console_output(frame, outer[2]);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, snap: &Snapshot) {
        let block = Block::default()
            .title(" BT Debug Console ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let status = self.backend.status.borrow().clone();
        let (link_text, link_color) = describe_status(&status);
        let target = if snap.has_ai {
            snap.mob_name.as_str()
        } else {
            "-"
        };

        let status_line = Line::from(vec![
            Span::styled("  Link: ", Style::default().fg(Color::Gray)),
            Span::styled(link_text, Style::default().fg(link_color)),
            Span::styled("  |  Target: ", Style::default().fg(Color::Gray)),
            Span::styled(target.to_string(), Style::default().fg(Color::White)),
            Span::styled("  |  Selected: ", Style::default().fg(Color::Gray)),
            Span::styled(
                snap.selected_count.to_string(),
                Style::default().fg(Color::Green),
            ),
        ]);

        frame.render_widget(Paragraph::new(status_line).block(block), area);
    }

    fn render_console_output(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Console Output ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));

        let inner_height = area.height.saturating_sub(2) as usize;
        let start = self.console_messages.len().saturating_sub(inner_height);

        let lines: Vec<Line> = self.console_messages[start..]
            .iter()
            .map(|(ts, msg, color)| {
                Line::from(vec![
                    Span::styled(
                        format!("  [{}] ", ts.format("%H:%M:%S")),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(msg.as_str(), Style::default().fg(*color)),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

fn describe_status(status: &LinkStatus) -> (String, Color) {
    match status {
        LinkStatus::Connecting { addr } => (format!("connecting to {}", addr), Color::Yellow),
        LinkStatus::Connected { addr } => (format!("connected ({})", addr), Color::Green),
        LinkStatus::Disconnected { addr, reason } => {
            (format!("disconnected from {} ({})", addr, reason), Color::Red)
        }
        LinkStatus::Demo => ("demo backend".to_string(), Color::Magenta),
    }
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the console event loop until the user quits.
pub async fn run_console(backend: BackendChannels, config: &UiConfig) -> Result<(), anyhow::Error> {
    use std::io::IsTerminal;
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(anyhow::anyhow!("BT Debug console requires a terminal (TTY)."));
    }

    // Restore the terminal even if rendering panics.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut console = DebugConsole::new(backend, config);
    let tick_rate = Duration::from_millis(config.tick_rate_ms.max(10));
    tracing::info!(tick_ms = config.tick_rate_ms, "Console started");

    let result = event_loop(&mut terminal, &mut console, tick_rate);

    restore_terminal(&mut terminal)?;
    tracing::info!("Console exited");
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    console: &mut DebugConsole,
    tick_rate: Duration,
) -> Result<(), anyhow::Error> {
    loop {
        let snapshot = console.refresh();

        terminal.draw(|frame| {
            console.render(frame, &snapshot);
        })?;

        if event::poll(tick_rate)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press
                    && console.handle_key(key_event.code, key_event.modifiers, &snapshot)
                        == KeyOutcome::Quit
                {
                    return Ok(());
                }
            }
        }
    }
}
