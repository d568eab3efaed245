//! Result path filtering (directory scope and hidden directories).

use std::path::{Path, PathBuf};

/// Filters applied to the raw output of the query tool.
///
/// Matching is component-wise: hiding `/home/a` hides `/home/a/x` but not
/// `/home/ab`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathFilter {
    dir: Option<PathBuf>,
    hidden: Vec<PathBuf>,
    undo: Vec<PathBuf>,
}

impl PathFilter {
    pub fn new(dir: Option<PathBuf>, hidden: Vec<PathBuf>) -> Self {
        Self {
            dir,
            hidden,
            undo: Vec::new(),
        }
    }

    /// `true` when no path would be rejected.
    pub fn is_noop(&self) -> bool {
        self.dir.is_none() && self.hidden.is_empty()
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Replace the directory scope; `None` shows results from everywhere.
    pub fn set_dir(&mut self, dir: Option<PathBuf>) {
        self.dir = dir;
    }

    pub fn hidden(&self) -> &[PathBuf] {
        &self.hidden
    }

    /// Return `true` if `path` should be shown.
    pub fn allows(&self, path: &str) -> bool {
        let path = Path::new(path);

        if let Some(dir) = &self.dir {
            if !path.starts_with(dir) {
                return false;
            }
        }

        !self.hidden.iter().any(|h| path.starts_with(h))
    }

    /// Hide a directory. Returns `false` if it was already hidden.
    pub fn hide(&mut self, dir: PathBuf) -> bool {
        if self.hidden.contains(&dir) {
            return false;
        }
        self.hidden.push(dir.clone());
        self.undo.push(dir);
        true
    }

    /// Un-hide the most recently hidden directory.
    pub fn undo_hide(&mut self) -> Option<PathBuf> {
        let dir = self.undo.pop()?;
        self.hidden.retain(|h| h != &dir);
        Some(dir)
    }
}

/// Parent directory of a result path, if it has a non-empty one.
pub fn parent_dir(path: &str) -> Option<PathBuf> {
    Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_allows_everything() {
        let filter = PathFilter::default();
        assert!(filter.is_noop());
        assert!(filter.allows("/anything/at/all"));
    }

    #[test]
    fn dir_scope_is_component_wise() {
        let filter = PathFilter::new(Some(PathBuf::from("/home/a")), Vec::new());
        assert!(filter.allows("/home/a/notes.txt"));
        assert!(filter.allows("/home/a"));
        assert!(!filter.allows("/home/ab/notes.txt"));
        assert!(!filter.allows("/etc/hosts"));
    }

    #[test]
    fn set_dir_narrows_and_clears_scope() {
        let mut filter = PathFilter::default();
        filter.set_dir(Some(PathBuf::from("/srv")));
        assert!(!filter.is_noop());
        assert!(!filter.allows("/home/x"));
        assert!(filter.allows("/srv/www/index.html"));

        filter.set_dir(None);
        assert!(filter.is_noop());
        assert!(filter.allows("/home/x"));
    }

    #[test]
    fn hide_and_undo() {
        let mut filter = PathFilter::default();
        assert!(filter.hide(PathBuf::from("/var/cache")));
        assert!(!filter.hide(PathBuf::from("/var/cache")));
        assert!(!filter.allows("/var/cache/apt/x.deb"));
        assert!(filter.allows("/var/cached"));

        assert_eq!(filter.undo_hide(), Some(PathBuf::from("/var/cache")));
        assert!(filter.allows("/var/cache/apt/x.deb"));
        assert_eq!(filter.undo_hide(), None);
    }

    #[test]
    fn configured_hidden_dirs_are_not_undoable() {
        let mut filter = PathFilter::new(None, vec![PathBuf::from("/proc")]);
        assert_eq!(filter.undo_hide(), None);
        assert!(!filter.allows("/proc/1/status"));
    }

    #[test]
    fn parent_dir_of_relative_name_is_none() {
        assert_eq!(parent_dir("/usr/bin/ls"), Some(PathBuf::from("/usr/bin")));
        assert_eq!(parent_dir("ls"), None);
    }
}
