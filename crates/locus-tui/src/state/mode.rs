//! Normal/Search mode machine.

use super::results::{ResultSet, ResultStore};

/// Session mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Navigate and act on results
    Normal,
    /// Edit the query; every edit requeries
    Search,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Normal, Mode::Search];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Search => "SEARCH",
        }
    }
}

/// What the session looked like when Search mode was entered, so a cancel
/// can put it back.
#[derive(Debug, Clone)]
pub struct SearchEntry {
    pub query: String,
    pub raw: ResultSet,
    pub results: ResultStore,
    /// Query generation current at entry
    pub generation: u64,
    /// That generation had not resolved yet
    pub pending: bool,
}

/// Tracks the current mode and the snapshot taken on entering Search.
#[derive(Debug)]
pub struct ModeMachine {
    mode: Mode,
    entry: Option<SearchEntry>,
}

impl ModeMachine {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            entry: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Normal -> Search. Returns `false` (and keeps the old snapshot) when
    /// already searching.
    pub fn enter_search(&mut self, entry: SearchEntry) -> bool {
        if self.mode == Mode::Search {
            return false;
        }
        self.mode = Mode::Search;
        self.entry = Some(entry);
        true
    }

    /// Search -> Normal, keeping whatever the search produced.
    pub fn confirm(&mut self) -> bool {
        if self.mode != Mode::Search {
            return false;
        }
        self.mode = Mode::Normal;
        self.entry = None;
        true
    }

    /// Search -> Normal, handing back the entry snapshot to restore.
    pub fn cancel(&mut self) -> Option<SearchEntry> {
        if self.mode != Mode::Search {
            return None;
        }
        self.mode = Mode::Normal;
        self.entry.take()
    }
}

impl Default for ModeMachine {
    fn default() -> Self {
        Self::new()
    }
}
