//! Configuration management for locus.

use crate::filter::PathFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for locus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External index query tool.
    pub query: QueryConfig,

    /// Search-mode behavior.
    pub search: SearchConfig,

    /// Result filtering.
    pub filter: FilterConfig,

    /// Commands used to act on a selected path.
    pub actions: ActionsConfig,

    /// Display settings.
    pub ui: UiConfig,

    /// Key bindings.
    pub keys: KeyConfig,
}

/// How the index query tool is invoked:
/// `<program> <args..> [<limit_flag> <limit>] <pattern>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub program: String,
    pub args: Vec<String>,
    pub limit_flag: String,
    /// Maximum number of results requested from the tool; 0 requests no cap.
    pub limit: usize,
    /// Upper bound for one invocation; 0 disables the bound.
    pub timeout_ms: u64,
    /// Quiet period before a submitted pattern is run.
    pub debounce_ms: u64,
    /// Exit codes that mean "no matches" rather than failure.
    pub empty_exit_codes: Vec<i32>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            program: "locate".to_string(),
            args: vec!["-i".to_string()],
            limit_flag: "-l".to_string(),
            limit: 1000,
            timeout_ms: 5000,
            debounce_ms: 60,
            empty_exit_codes: vec![1],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Start every search with an empty query instead of the last one.
    pub clear_on_enter: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Only show results under this directory.
    pub dir: Option<PathBuf>,
    /// Directories whose contents are hidden from results.
    pub blacklist: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    /// Opener; the selected path is appended as the last argument.
    pub open: Vec<String>,
    /// Clipboard command; the selected path is written to its stdin.
    pub copy: Vec<String>,
    /// Upper bound for a results filter command; 0 disables the bound.
    pub filter_timeout_ms: u64,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        let (open, copy) = if cfg!(target_os = "macos") {
            ("open", "pbcopy")
        } else {
            ("xdg-open", "wl-copy")
        };
        Self {
            open: vec![open.to_string()],
            copy: vec![copy.to_string()],
            filter_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long a transient status message stays visible.
    pub status_ttl_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            status_ttl_ms: 2000,
        }
    }
}

/// Key strings per binding, e.g. `"j"`, `"G"`, `"enter"`, `"ctrl-c"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub enter_search: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub top: Vec<String>,
    pub bottom: Vec<String>,
    pub activate: Vec<String>,
    pub copy: Vec<String>,
    pub print: Vec<String>,
    pub hide_dir: Vec<String>,
    pub undo_hide: Vec<String>,
    pub clear_query: Vec<String>,
    pub open_with: Vec<String>,
    pub pipe_filter: Vec<String>,
    pub scope_dir: Vec<String>,
    pub hide_path: Vec<String>,
    pub quit: Vec<String>,
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| k.to_string()).collect()
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            enter_search: keys(&["/", "i"]),
            confirm: keys(&["enter"]),
            cancel: keys(&["esc"]),
            up: keys(&["k", "up"]),
            down: keys(&["j", "down"]),
            top: keys(&["g", "home"]),
            bottom: keys(&["G", "end"]),
            activate: keys(&["enter"]),
            copy: keys(&["y", "c"]),
            print: keys(&["p"]),
            hide_dir: keys(&["b"]),
            undo_hide: keys(&["u"]),
            clear_query: keys(&["ctrl-u"]),
            open_with: keys(&["o"]),
            pipe_filter: keys(&["f"]),
            scope_dir: keys(&["d"]),
            hide_path: keys(&["B"]),
            quit: keys(&["q", "ctrl-c"]),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;

        config.expand_tilde_in_paths();
        config.validate()?;

        Ok(config)
    }

    /// Load `path` if it exists, otherwise return the defaults.
    pub fn load_or_default(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build the result filter described by the `[filter]` section.
    pub fn path_filter(&self) -> PathFilter {
        PathFilter::new(self.filter.dir.clone(), self.filter.blacklist.clone())
    }

    /// Expand `~` in a user-supplied path.
    pub fn expand_path(path: &Path) -> PathBuf {
        let raw = path.to_string_lossy();
        PathBuf::from(shellexpand::tilde(&raw).into_owned())
    }

    fn expand_tilde_in_paths(&mut self) {
        self.filter.dir = self.filter.dir.as_deref().map(Self::expand_path);
        self.filter.blacklist = self
            .filter
            .blacklist
            .iter()
            .map(|p| Self::expand_path(p))
            .collect();
    }

    fn validate(&self) -> crate::Result<()> {
        if self.query.program.trim().is_empty() {
            return Err(crate::Error::Config(
                "query.program must not be empty".to_string(),
            ));
        }
        if self.actions.open.is_empty() || self.actions.copy.is_empty() {
            return Err(crate::Error::Config(
                "actions.open and actions.copy need a program".to_string(),
            ));
        }
        Ok(())
    }
}
