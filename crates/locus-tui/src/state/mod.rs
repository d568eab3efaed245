//! Session state and the render snapshot built from it.

mod mode;
mod results;

pub use mode::{Mode, ModeMachine, SearchEntry};
pub use results::{result_set, PathEntry, ResultSet, ResultStore};

use crate::keymap::KeyHint;
use locus_core::PathFilter;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Severity of a status line message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// What a one-line command prompt is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Command to open the selection with; the path is appended
    OpenWith,
    /// Shell command the visible results are piped through
    PipeFilter,
    /// Directory to scope results to; empty clears the scope
    ScopeDir,
    /// Directory to hide from results
    HidePath,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            PromptKind::OpenWith => "Open with: ",
            PromptKind::PipeFilter => "Filter through: ",
            PromptKind::ScopeDir => "Only under: ",
            PromptKind::HidePath => "Hide directory: ",
        }
    }
}

/// An open command prompt and the text typed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub text: String,
}

/// Transient message shown in the footer until it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub expires_at: Instant,
}

/// Everything one running session knows. Owned by the session loop and
/// mutated only while applying a command or a query outcome.
#[derive(Debug)]
pub struct SessionState {
    pub modes: ModeMachine,
    /// Query text as currently typed
    pub query: String,
    /// Last query confirmed with the confirm key
    pub committed_query: String,
    /// Command prompt shown over the query line, if any
    pub prompt: Option<Prompt>,
    /// Unfiltered output of the last successful query
    pub raw: ResultSet,
    pub results: ResultStore,
    pub filter: PathFilter,
    pub status: Option<StatusMessage>,
    /// A query for the current text is still outstanding
    pub searching: bool,
    pub should_quit: bool,
    /// Path to print on exit (shell integration)
    pub print_on_exit: Option<String>,
}

impl SessionState {
    pub fn new(filter: PathFilter) -> Self {
        Self {
            modes: ModeMachine::new(),
            query: String::new(),
            committed_query: String::new(),
            prompt: None,
            raw: Arc::default(),
            results: ResultStore::new(),
            filter,
            status: None,
            searching: false,
            should_quit: false,
            print_on_exit: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    /// Install the output of a finished query.
    pub fn apply_results(&mut self, raw: ResultSet) {
        let visible = filtered(&raw, &self.filter);
        self.raw = raw;
        self.results.replace(visible);
    }

    /// Re-derive the visible results after a filter change.
    pub fn refilter(&mut self) {
        let visible = filtered(&self.raw, &self.filter);
        self.results.refilter(visible);
    }

    /// Replace the visible results with the output of a filter command.
    /// The raw set is kept, so the next filter change or query undoes it.
    pub fn apply_piped(&mut self, visible: ResultSet) {
        self.results.replace(visible);
    }

    /// Snapshot of what Search mode may need to put back on cancel.
    /// `generation`/`pending` describe the query in flight at entry.
    pub fn search_entry(&self, generation: u64, pending: bool) -> SearchEntry {
        SearchEntry {
            query: self.query.clone(),
            raw: Arc::clone(&self.raw),
            results: self.results.clone(),
            generation,
            pending,
        }
    }

    pub fn restore(&mut self, entry: SearchEntry) {
        self.query = entry.query;
        self.raw = entry.raw;
        self.results = entry.results;
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel, ttl: Duration) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            expires_at: Instant::now() + ttl,
        });
    }

    /// Drop an expired status message. Returns `true` if one was dropped.
    pub fn expire_status(&mut self, now: Instant) -> bool {
        match &self.status {
            Some(status) if status.expires_at <= now => {
                self.status = None;
                true
            }
            _ => false,
        }
    }

    /// Build the snapshot for a results window of `height` rows. Scrolls the
    /// viewport so the selection stays visible. Key hints start empty; the
    /// session fills them in from its keymap.
    pub fn snapshot(&mut self, height: usize) -> RenderSnapshot<'_> {
        self.results.scroll_to_selection(height);

        let offset = self.results.viewport_offset();
        let rows = self
            .results
            .visible(height)
            .iter()
            .enumerate()
            .map(|(i, path)| ResultRow {
                index: offset + i,
                path: &**path,
            })
            .collect();

        RenderSnapshot {
            mode: self.modes.mode(),
            query: &self.query,
            committed_query: &self.committed_query,
            prompt: self.prompt.as_ref(),
            rows,
            selected: self.results.selected_index(),
            total: self.results.len(),
            viewport_offset: offset,
            status: self.status.as_ref(),
            searching: self.searching,
            hidden_dirs: self.filter.hidden().len(),
            dir_filter: self.filter.dir(),
            hints: &[],
        }
    }
}

fn filtered(raw: &ResultSet, filter: &PathFilter) -> ResultSet {
    if filter.is_noop() {
        return Arc::clone(raw);
    }
    Arc::new(
        raw.iter()
            .filter(|p| filter.allows(p))
            .cloned()
            .collect(),
    )
}

/// One visible result with its absolute position in the result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow<'a> {
    pub index: usize,
    pub path: &'a str,
}

/// Read-only view handed to the renderer.
#[derive(Debug, Clone)]
pub struct RenderSnapshot<'a> {
    pub mode: Mode,
    pub query: &'a str,
    pub committed_query: &'a str,
    pub prompt: Option<&'a Prompt>,
    pub rows: Vec<ResultRow<'a>>,
    pub selected: usize,
    pub total: usize,
    pub viewport_offset: usize,
    pub status: Option<&'a StatusMessage>,
    pub searching: bool,
    pub hidden_dirs: usize,
    pub dir_filter: Option<&'a Path>,
    pub hints: &'a [KeyHint],
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn new_session_is_empty_and_normal() {
        let state = SessionState::new(PathFilter::default());
        assert_eq!(state.mode(), Mode::Normal);
        assert!(state.query.is_empty());
        assert!(state.results.is_empty());
        assert_eq!(state.results.selected_index(), 0);
    }

    #[test]
    fn apply_results_filters_but_keeps_raw() {
        let filter = PathFilter::new(None, vec![PathBuf::from("/proc")]);
        let mut state = SessionState::new(filter);
        state.apply_results(result_set(["/proc/1", "/home/x", "/proc/2", "/etc/y"]));

        assert_eq!(state.raw.len(), 4);
        let visible: Vec<&str> = state.results.entries().iter().map(|p| &**p).collect();
        assert_eq!(visible, vec!["/home/x", "/etc/y"]);
    }

    #[test]
    fn refilter_keeps_selection_clamped() {
        let mut state = SessionState::new(PathFilter::default());
        state.apply_results(result_set(["/a/1", "/a/2", "/b/1", "/b/2"]));
        state.results.move_selection(3);

        state.filter.hide(PathBuf::from("/b"));
        state.refilter();
        assert_eq!(state.results.len(), 2);
        assert_eq!(state.results.selected_index(), 1);

        state.filter.undo_hide();
        state.refilter();
        assert_eq!(state.results.len(), 4);
        assert_eq!(state.results.selected_index(), 1);
    }

    #[test]
    fn snapshot_carries_absolute_indices() {
        let mut state = SessionState::new(PathFilter::default());
        state.apply_results(result_set((0..30).map(|i| format!("/r/{i}"))));
        state.results.move_selection(20);

        let snapshot = state.snapshot(5);
        assert_eq!(snapshot.selected, 20);
        assert_eq!(snapshot.total, 30);
        assert_eq!(snapshot.viewport_offset, 16);
        assert_eq!(snapshot.rows.len(), 5);
        assert_eq!(
            snapshot.rows[4],
            ResultRow {
                index: 20,
                path: "/r/20"
            }
        );
    }

    #[test]
    fn piped_results_replace_view_until_refilter() {
        let mut state = SessionState::new(PathFilter::default());
        state.apply_results(result_set(["/a/1", "/a/2", "/b/1"]));
        state.results.move_selection(2);

        state.apply_piped(result_set(["/a/2"]));
        assert_eq!(state.results.len(), 1);
        assert_eq!(state.results.selected_index(), 0);
        assert_eq!(state.raw.len(), 3);

        state.refilter();
        assert_eq!(state.results.len(), 3);
    }

    #[test]
    fn status_expires() {
        let mut state = SessionState::new(PathFilter::default());
        state.set_status("hello", StatusLevel::Info, Duration::from_secs(60));
        assert!(!state.expire_status(Instant::now()));
        assert!(state.expire_status(Instant::now() + Duration::from_secs(120)));
        assert!(state.status.is_none());
    }
}
