mod keymap;
mod register_flow;
mod theme;
mod ui;

use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use register_flow::RegisterScreen;
use signup_app::App;

use crate::ui::modal::render_error_modal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiExit {
    /// An account was created and the success notice dismissed.
    Completed,
    /// Esc on the first step.
    Left,
    /// Ctrl-C.
    Canceled,
}

const TICK_RATE: Duration = Duration::from_millis(120);

pub(crate) struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub(crate) fn enter() -> Result<Self> {
        let terminal = enter_with_ops(
            || enable_raw_mode().context("failed to enable raw mode"),
            || {
                let mut out = stdout();
                execute!(out, EnterAlternateScreen, Hide)
                    .context("failed to enter alternate screen")
            },
            || {
                let backend = CrosstermBackend::new(stdout());
                Terminal::new(backend).context("failed to create terminal backend")
            },
            || {
                let mut out = stdout();
                execute!(out, Show, LeaveAlternateScreen)
                    .context("failed to restore terminal screen during rollback")
            },
            || disable_raw_mode().context("failed to disable raw mode during rollback"),
        )?;
        Ok(Self { terminal })
    }

    pub(crate) fn draw<F>(&mut self, draw_fn: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame<'_>),
    {
        self.terminal
            .draw(draw_fn)
            .context("failed to render terminal")?;
        Ok(())
    }

    pub(crate) fn autoresize(&mut self) -> Result<()> {
        self.terminal
            .autoresize()
            .context("failed to autoresize terminal")?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(self.terminal.backend_mut(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Runs the terminal setup steps in order, undoing the completed ones when a
/// later step fails.
fn enter_with_ops<T, EnableRaw, EnterAlt, CreateTerminal, LeaveAlt, DisableRaw>(
    mut enable_raw: EnableRaw,
    mut enter_alt: EnterAlt,
    mut create_terminal: CreateTerminal,
    mut leave_alt: LeaveAlt,
    mut disable_raw: DisableRaw,
) -> Result<T>
where
    EnableRaw: FnMut() -> Result<()>,
    EnterAlt: FnMut() -> Result<()>,
    CreateTerminal: FnMut() -> Result<T>,
    LeaveAlt: FnMut() -> Result<()>,
    DisableRaw: FnMut() -> Result<()>,
{
    enable_raw()?;

    if let Err(error) = enter_alt() {
        return Err(with_rollback(error, false, &mut leave_alt, &mut disable_raw));
    }

    create_terminal().map_err(|error| with_rollback(error, true, &mut leave_alt, &mut disable_raw))
}

fn with_rollback<LeaveAlt, DisableRaw>(
    setup_error: anyhow::Error,
    alt_screen_entered: bool,
    leave_alt: &mut LeaveAlt,
    disable_raw: &mut DisableRaw,
) -> anyhow::Error
where
    LeaveAlt: FnMut() -> Result<()>,
    DisableRaw: FnMut() -> Result<()>,
{
    let mut cleanup_failures = Vec::<String>::new();

    if alt_screen_entered && let Err(error) = leave_alt() {
        cleanup_failures.push(format!("{error:#}"));
    }
    if let Err(error) = disable_raw() {
        cleanup_failures.push(format!("{error:#}"));
    }

    if cleanup_failures.is_empty() {
        setup_error
    } else {
        anyhow!(
            "{setup_error:#}\nterminal rollback cleanup failed: {}",
            cleanup_failures.join("\n")
        )
    }
}

pub(crate) fn is_ctrl_c(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Shows the registration wizard until the user finishes, leaves, or cancels.
pub fn run_wizard(app: &App) -> Result<UiExit> {
    let mut session = TerminalSession::enter()?;
    let mut screen = RegisterScreen::new(app);
    let mut global_error: Option<String> = None;

    loop {
        session.draw(|frame| {
            screen.render(frame);
            if let Some(message) = global_error.as_deref() {
                render_error_modal(frame, message, "Enter/Esc: continue");
            }
        })?;

        let has_event = event::poll(TICK_RATE).context("failed to poll terminal event")?;
        if !has_event {
            screen.on_tick(Instant::now());
            continue;
        }

        let event = event::read().context("failed to read terminal event")?;
        let key = match event {
            Event::Resize(_, _) => {
                if let Err(error) = session.autoresize() {
                    global_error = Some(format!("{error:#}"));
                }
                continue;
            }
            Event::Key(key) if matches!(key.kind, KeyEventKind::Press) => key,
            _ => continue,
        };

        if is_ctrl_c(key) {
            screen.leave();
            return Ok(UiExit::Canceled);
        }

        if global_error.is_some() {
            if keymap::is_confirm(key) || keymap::is_back(key) {
                global_error = None;
            }
            continue;
        }

        if let Some(exit) = screen.on_key(key, Instant::now()) {
            return Ok(exit);
        }

        if screen.should_poll_after_input() {
            screen.on_tick(Instant::now());
        }
    }
}

pub(crate) fn centered_rect(
    percent_x: u16,
    percent_y: u16,
    area: ratatui::layout::Rect,
) -> ratatui::layout::Rect {
    let pct_x = percent_x.min(100);
    let pct_y = percent_y.min(100);

    let [_, vertical, _] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ])
        .areas(area);
    let [_, horizontal, _] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ])
        .areas(vertical);
    horizontal
}
