//! Result list view model: the current result set, selection and viewport.

use std::sync::Arc;

/// One path as printed by the query tool. Never parsed by the session.
pub type PathEntry = Arc<str>;

/// Ordered results of one query, shared copy-on-replace.
pub type ResultSet = Arc<Vec<PathEntry>>;

/// Holds the visible result set and the selection/scroll position over it.
///
/// Invariants after every mutation:
/// - `selected < max(1, len)`
/// - after [`ResultStore::scroll_to_selection`],
///   `offset <= selected < offset + height`
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    entries: ResultSet,
    selected: usize,
    offset: usize,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a fresh result set. Selection and scroll go back to the top.
    pub fn replace(&mut self, entries: ResultSet) {
        self.entries = entries;
        self.selected = 0;
        self.offset = 0;
    }

    /// Swap in a re-filtered view of the same query, keeping the selection
    /// index where it was (clamped).
    pub fn refilter(&mut self, entries: ResultSet) {
        self.entries = entries;
        self.clamp();
    }

    pub fn entries(&self) -> &ResultSet {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn viewport_offset(&self) -> usize {
        self.offset
    }

    /// Move the selection by `delta`, clamped to the result bounds.
    pub fn move_selection(&mut self, delta: isize) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() - 1;
        let target = if delta.is_negative() {
            self.selected.saturating_sub(delta.unsigned_abs())
        } else {
            self.selected.saturating_add(delta.unsigned_abs())
        };
        self.selected = target.min(last);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.entries.len().saturating_sub(1);
    }

    pub fn current_selection(&self) -> Option<&PathEntry> {
        self.entries.get(self.selected)
    }

    /// Adjust the scroll offset so the selection sits inside a window of
    /// `height` rows.
    pub fn scroll_to_selection(&mut self, height: usize) {
        let height = height.max(1);

        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected + 1 - height;
        }

        // Don't leave blank rows at the bottom after the set shrank.
        let max_offset = self.entries.len().saturating_sub(height);
        self.offset = self.offset.min(max_offset).min(self.selected);
    }

    /// Rows currently inside the window; call after
    /// [`ResultStore::scroll_to_selection`].
    pub fn visible(&self, height: usize) -> &[PathEntry] {
        let start = self.offset.min(self.entries.len());
        let end = (start + height).min(self.entries.len());
        &self.entries[start..end]
    }

    /// Scroll so the selection is visible and return the visible rows.
    pub fn viewport_slice(&mut self, height: usize) -> &[PathEntry] {
        self.scroll_to_selection(height);
        self.visible(height)
    }

    fn clamp(&mut self) {
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
        self.offset = self.offset.min(self.selected);
    }
}

/// Build a [`ResultSet`] from owned strings.
pub fn result_set<I, S>(paths: I) -> ResultSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Arc::new(paths.into_iter().map(|p| Arc::from(p.as_ref())).collect())
}
