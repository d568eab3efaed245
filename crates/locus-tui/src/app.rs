//! Terminal setup and the crossterm/ratatui side of the session.

use crate::actions::CommandLauncher;
use crate::keymap::Keymap;
use crate::session::{EventSource, Renderer, Session, SessionOutcome, SessionSettings};
use crate::state::{RenderSnapshot, SessionState};
use crate::ui;
use crate::worker::{CommandTool, QueryRunner};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use locus_core::Config;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::{debug, warn};

/// Raw mode plus alternate screen, restored on drop.
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn acquire() -> locus_core::Result<Self> {
        let terminal_err = |e: io::Error| locus_core::Error::Terminal(e.to_string());

        enable_raw_mode().map_err(terminal_err)?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(terminal_err(e));
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                let _ = disable_raw_mode();
                Err(terminal_err(e))
            }
        }
    }

    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("failed to leave raw mode: {e}");
        }
        if let Err(e) = execute!(self.terminal.backend_mut(), LeaveAlternateScreen) {
            warn!("failed to leave alternate screen: {e}");
        }
        if let Err(e) = self.terminal.show_cursor() {
            warn!("failed to show cursor: {e}");
        }
    }
}

/// Key events from the real terminal.
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if event::poll(timeout)? {
            event::read().map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Draws snapshots onto any ratatui backend.
pub struct TuiRenderer<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
}

impl<'a, B: Backend> TuiRenderer<'a, B> {
    pub fn new(terminal: &'a mut Terminal<B>) -> Self {
        Self { terminal }
    }
}

impl<B: Backend> Renderer for TuiRenderer<'_, B> {
    fn viewport_height(&mut self) -> Result<usize> {
        let size = self.terminal.size().context("failed to query terminal size")?;
        Ok(ui::results_height(Rect::new(0, 0, size.width, size.height)))
    }

    fn render(&mut self, snapshot: &RenderSnapshot<'_>) -> Result<()> {
        self.terminal
            .draw(|f| ui::draw(f, snapshot))
            .context("failed to draw frame")?;
        Ok(())
    }
}

/// Build a session from config, without touching the terminal.
pub fn build_session(config: &Config) -> Result<Session> {
    let keymap = Keymap::from_config(&config.keys)?;
    let tool = CommandTool::new(&config.query).context("failed to start query runtime")?;
    let runner = QueryRunner::spawn(tool, Duration::from_millis(config.query.debounce_ms));

    debug!(program = %config.query.program, "session built");
    Ok(Session::new(
        SessionState::new(config.path_filter()),
        keymap,
        runner,
        Box::new(CommandLauncher::new(&config.actions)),
        SessionSettings::from_config(config),
    ))
}

/// Run the interactive session until the user quits.
pub fn run(config: &Config, initial_pattern: Option<&str>) -> Result<SessionOutcome> {
    let mut session = build_session(config)?;
    session.start(initial_pattern);

    let mut guard = TerminalGuard::acquire()?;
    let mut renderer = TuiRenderer::new(guard.terminal());
    let outcome = session.run(&mut CrosstermEvents, &mut renderer);

    // Restore the terminal before the caller prints anything.
    drop(renderer);
    drop(guard);
    outcome
}
