//! The session loop: read a key, dispatch it, apply the command, render.

use crate::actions::Launcher;
use crate::keymap::{Keymap, QueryEdit, SessionCommand};
use crate::state::{Mode, Prompt, PromptKind, RenderSnapshot, SessionState, StatusLevel};
use crate::worker::{QueryOutcome, QueryRunner};
use anyhow::{Context, Result};
use crossterm::event::{Event, KeyEvent};
use locus_core::filter::parent_dir;
use locus_core::Config;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Where key events come from.
pub trait EventSource {
    /// Wait up to `timeout` for the next terminal event.
    fn next_event(&mut self, timeout: Duration) -> std::io::Result<Option<Event>>;
}

/// Draws render snapshots.
pub trait Renderer {
    /// Rows available for results in the next frame.
    fn viewport_height(&mut self) -> Result<usize>;
    fn render(&mut self, snapshot: &RenderSnapshot<'_>) -> Result<()>;
}

/// Session knobs taken from the config file.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub clear_on_enter: bool,
    pub status_ttl: Duration,
    /// Longest wait for input before checking query results again.
    pub tick: Duration,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            clear_on_enter: config.search.clear_on_enter,
            status_ttl: Duration::from_millis(config.ui.status_ttl_ms),
            ..Self::default()
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            clear_on_enter: false,
            status_ttl: Duration::from_secs(2),
            tick: Duration::from_millis(50),
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Path the user asked to print on exit.
    pub print: Option<String>,
}

pub struct Session {
    state: SessionState,
    keymap: Keymap,
    runner: QueryRunner,
    launcher: Box<dyn Launcher>,
    settings: SessionSettings,
}

impl Session {
    pub fn new(
        state: SessionState,
        keymap: Keymap,
        runner: QueryRunner,
        launcher: Box<dyn Launcher>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            state,
            keymap,
            runner,
            launcher,
            settings,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Submit an initial pattern. The session stays in Normal mode.
    pub fn start(&mut self, pattern: Option<&str>) {
        let Some(pattern) = pattern.filter(|p| !p.trim().is_empty()) else {
            return;
        };
        self.state.query = pattern.to_string();
        self.state.committed_query = pattern.to_string();
        self.submit();
    }

    /// Run until quit. Input errors end the session with an error.
    pub fn run(
        &mut self,
        events: &mut dyn EventSource,
        renderer: &mut dyn Renderer,
    ) -> Result<SessionOutcome> {
        info!(query = %self.state.query, "session started");

        while !self.state.should_quit {
            self.pump_results();
            self.state.expire_status(Instant::now());

            let height = renderer.viewport_height()?;
            let hints = self
                .keymap
                .hints(self.state.mode(), self.state.prompt.is_some());
            let mut snapshot = self.state.snapshot(height);
            snapshot.hints = &hints;
            renderer.render(&snapshot)?;

            match events
                .next_event(self.settings.tick)
                .context("failed to read terminal input")?
            {
                Some(Event::Key(key)) => {
                    self.handle_key(&key);
                }
                Some(_) | None => {}
            }
        }

        info!("session finished");
        Ok(SessionOutcome {
            print: self.state.print_on_exit.take(),
        })
    }

    /// Dispatch one key event and apply the resulting command.
    pub fn handle_key(&mut self, key: &KeyEvent) -> SessionCommand {
        let command = if self.state.prompt.is_some() {
            self.keymap.dispatch_prompt(key)
        } else {
            self.keymap.dispatch(self.state.mode(), key)
        };
        self.apply(command);
        command
    }

    pub fn apply(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::EnterSearch => self.enter_search(),
            SessionCommand::ConfirmSearch => {
                if self.state.modes.confirm() {
                    self.state.committed_query = self.state.query.clone();
                    debug!(query = %self.state.committed_query, "search confirmed");
                }
            }
            SessionCommand::CancelSearch => self.cancel_search(),
            SessionCommand::EditQuery(edit) => self.edit_query(edit),
            SessionCommand::MoveSelection(delta) => self.state.results.move_selection(delta),
            SessionCommand::SelectFirst => self.state.results.select_first(),
            SessionCommand::SelectLast => self.state.results.select_last(),
            SessionCommand::ActivateSelection => self.activate(),
            SessionCommand::CopySelection => self.copy(),
            SessionCommand::PrintSelection => {
                if let Some(path) = self.state.results.current_selection() {
                    self.state.print_on_exit = Some(path.to_string());
                    self.state.should_quit = true;
                }
            }
            SessionCommand::HideSelectionDir => self.hide_selection_dir(),
            SessionCommand::UndoHide => self.undo_hide(),
            SessionCommand::StartPrompt(kind) => self.start_prompt(kind),
            SessionCommand::EditPrompt(edit) => {
                if let Some(prompt) = self.state.prompt.as_mut() {
                    edit_text(&mut prompt.text, edit);
                }
            }
            SessionCommand::SubmitPrompt => self.submit_prompt(),
            SessionCommand::CancelPrompt => self.state.prompt = None,
            SessionCommand::Quit => self.state.should_quit = true,
            SessionCommand::NoOp => {}
        }
    }

    /// Apply the outcome of the latest query if it has arrived.
    pub fn pump_results(&mut self) {
        while let Some(outcome) = self.runner.poll() {
            self.apply_outcome(outcome);
        }
        self.state.searching = self.runner.is_pending();
    }

    /// Block up to `timeout` for the latest query. Returns `true` if an
    /// outcome was applied.
    pub fn wait_for_results(&mut self, timeout: Duration) -> bool {
        let applied = match self.runner.wait(timeout) {
            Some(outcome) => {
                self.apply_outcome(outcome);
                true
            }
            None => false,
        };
        self.state.searching = self.runner.is_pending();
        applied
    }

    fn apply_outcome(&mut self, outcome: QueryOutcome) {
        match outcome.result {
            Ok(raw) => {
                debug!(
                    generation = outcome.generation,
                    pattern = %outcome.pattern,
                    count = raw.len(),
                    "query resolved"
                );
                self.state.apply_results(raw);
            }
            Err(e) => {
                warn!(pattern = %outcome.pattern, "query failed: {e}");
                let failure = locus_core::Error::Query {
                    pattern: outcome.pattern,
                    message: e.to_string(),
                };
                self.status(failure.to_string(), StatusLevel::Error);
            }
        }
    }

    fn enter_search(&mut self) {
        let entry = self
            .state
            .search_entry(self.runner.current_generation(), self.runner.is_pending());
        if !self.state.modes.enter_search(entry) {
            return;
        }
        if self.settings.clear_on_enter {
            self.state.query.clear();
        }
    }

    /// Put back the query and results from before Search mode. Queries
    /// submitted while searching are dropped. A query that was still
    /// running at entry keeps its claim on the results.
    fn cancel_search(&mut self) {
        let Some(entry) = self.state.modes.cancel() else {
            return;
        };

        let submitted_since = self.runner.current_generation() != entry.generation;
        if submitted_since {
            self.runner.invalidate();
            let resubmit = entry.pending;
            self.state.restore(entry);
            if resubmit {
                debug!(query = %self.state.query, "resubmitting query pending at entry");
                self.runner.submit(&self.state.query);
            }
        } else if entry.pending && !self.runner.is_pending() {
            // Resolved while searching: those results are newer than the snapshot.
            self.state.query = entry.query;
        } else {
            self.state.restore(entry);
        }

        self.state.searching = self.runner.is_pending();
        debug!(query = %self.state.query, "search cancelled");
    }

    fn edit_query(&mut self, edit: QueryEdit) {
        if self.state.mode() != Mode::Search {
            return;
        }
        if edit_text(&mut self.state.query, edit) {
            self.submit();
        }
    }

    fn submit(&mut self) {
        self.runner.submit(&self.state.query);
        self.state.searching = self.runner.is_pending();
    }

    fn activate(&mut self) {
        let Some(path) = self.state.results.current_selection().cloned() else {
            return;
        };
        match self.launcher.open(&path) {
            Ok(()) => self.status(format!("Opening {}", display_name(&path)), StatusLevel::Info),
            Err(e) => {
                warn!(path = %path, "open failed: {e:#}");
                self.status(format!("Open failed: {e:#}"), StatusLevel::Error);
            }
        }
    }

    fn copy(&mut self) {
        let Some(path) = self.state.results.current_selection().cloned() else {
            return;
        };
        match self.launcher.copy(&path) {
            Ok(()) => self.status(format!("Copied: {}", display_name(&path)), StatusLevel::Info),
            Err(e) => {
                warn!(path = %path, "copy failed: {e:#}");
                self.status(format!("Copy failed: {e:#}"), StatusLevel::Error);
            }
        }
    }

    fn hide_selection_dir(&mut self) {
        let Some(dir) = self
            .state
            .results
            .current_selection()
            .and_then(|p| parent_dir(p))
        else {
            return;
        };

        let label = dir.display().to_string();
        if self.state.filter.hide(dir) {
            self.state.refilter();
            info!(dir = %label, "hid directory");
            self.status(format!("Hidden: {label} (u to undo)"), StatusLevel::Info);
        }
    }

    fn undo_hide(&mut self) {
        match self.state.filter.undo_hide() {
            Some(dir) => {
                self.state.refilter();
                info!(dir = %dir.display(), "restored directory");
                self.status(format!("Restored: {}", dir.display()), StatusLevel::Info);
            }
            None => self.status("Nothing to undo", StatusLevel::Info),
        }
    }

    fn start_prompt(&mut self, kind: PromptKind) {
        if self.state.mode() != Mode::Normal {
            return;
        }
        let ready = match kind {
            PromptKind::OpenWith => self.state.results.current_selection().is_some(),
            PromptKind::PipeFilter => !self.state.results.is_empty(),
            PromptKind::ScopeDir | PromptKind::HidePath => true,
        };
        if !ready {
            return;
        }

        let text = match kind {
            PromptKind::ScopeDir => self
                .state
                .filter
                .dir()
                .map(|d| d.display().to_string())
                .unwrap_or_default(),
            _ => String::new(),
        };
        self.state.prompt = Some(Prompt { kind, text });
    }

    fn submit_prompt(&mut self) {
        let Some(prompt) = self.state.prompt.take() else {
            return;
        };
        let text = prompt.text.trim();

        match prompt.kind {
            PromptKind::OpenWith if !text.is_empty() => self.open_with(text),
            PromptKind::PipeFilter if !text.is_empty() => self.pipe_filter(text),
            PromptKind::ScopeDir => self.scope_dir(text),
            PromptKind::HidePath if !text.is_empty() => self.hide_path(text),
            _ => {}
        }
    }

    fn open_with(&mut self, command: &str) {
        let Some(path) = self.state.results.current_selection().cloned() else {
            return;
        };
        match self.launcher.open_with(command, &path) {
            Ok(()) => self.status(format!("Opening with '{command}'..."), StatusLevel::Info),
            Err(e) => {
                warn!(command, path = %path, "open-with failed: {e:#}");
                self.status(format!("Open failed: {e:#}"), StatusLevel::Error);
            }
        }
    }

    fn pipe_filter(&mut self, command: &str) {
        let input = Arc::clone(self.state.results.entries());
        match self.launcher.pipe(command, &input) {
            Ok(kept) => {
                info!(command, before = input.len(), after = kept.len(), "results piped");
                self.state.apply_piped(Arc::new(kept));
                self.status("Results filtered.", StatusLevel::Info);
            }
            Err(e) => {
                warn!(command, "filter command failed: {e:#}");
                self.status(format!("Filter error: {e:#}"), StatusLevel::Error);
            }
        }
    }

    fn scope_dir(&mut self, text: &str) {
        if text.is_empty() {
            if self.state.filter.dir().is_some() {
                self.state.filter.set_dir(None);
                self.state.refilter();
                self.status("Directory filter cleared", StatusLevel::Info);
            }
            return;
        }

        let dir = match absolute(text) {
            Ok(dir) => dir,
            Err(e) => {
                self.status(format!("Bad directory: {e:#}"), StatusLevel::Error);
                return;
            }
        };
        let label = dir.display().to_string();
        self.state.filter.set_dir(Some(dir));
        self.state.refilter();
        info!(dir = %label, "directory filter set");
        self.status(format!("Only under: {label}"), StatusLevel::Info);
    }

    fn hide_path(&mut self, text: &str) {
        let dir = match absolute(text) {
            Ok(dir) => dir,
            Err(e) => {
                self.status(format!("Bad directory: {e:#}"), StatusLevel::Error);
                return;
            }
        };
        let label = dir.display().to_string();
        if self.state.filter.hide(dir) {
            self.state.refilter();
            info!(dir = %label, "hid directory");
            self.status(format!("Hidden: {label} (u to undo)"), StatusLevel::Info);
        } else {
            self.status(format!("Already hidden: {label}"), StatusLevel::Info);
        }
    }

    fn status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.state.set_status(text, level, self.settings.status_ttl);
    }
}

/// Apply one edit to a line of typed text. Returns `true` if it changed.
fn edit_text(text: &mut String, edit: QueryEdit) -> bool {
    match edit {
        QueryEdit::Insert(c) => {
            text.push(c);
            true
        }
        QueryEdit::Backspace => text.pop().is_some(),
        QueryEdit::Clear => {
            let had_text = !text.is_empty();
            text.clear();
            had_text
        }
    }
}

/// Expand `~` and resolve a relative directory against the working
/// directory.
fn absolute(text: &str) -> Result<PathBuf> {
    let path = Config::expand_path(Path::new(text));
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("no working directory")?;
    Ok(cwd.join(path))
}

fn display_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}
