//! Common filesystem paths used by locus.

use std::path::PathBuf;

/// Base directory for locus state (config, log).
///
/// Defaults to `$XDG_CONFIG_HOME/locus`, falling back to `~/.config/locus`.
/// `LOCUS_DIR` overrides it for testing or multi-instance setups.
pub fn locus_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LOCUS_DIR") {
        return PathBuf::from(dir);
    }

    if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
        if !dir.is_empty() {
            return PathBuf::from(dir).join("locus");
        }
    }

    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".config").join("locus")
}

/// Path to the locus configuration file.
pub fn config_path() -> PathBuf {
    locus_dir().join("config.toml")
}

/// Path to the session log file.
pub fn log_path() -> PathBuf {
    locus_dir().join("locus.log")
}

#[doc(hidden)]
pub fn test_env_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locus_dir_env_override_wins() {
        let _lock = test_env_lock();
        std::env::set_var("LOCUS_DIR", "/tmp/locus-test-dir");

        assert_eq!(locus_dir(), PathBuf::from("/tmp/locus-test-dir"));
        assert_eq!(
            config_path(),
            PathBuf::from("/tmp/locus-test-dir/config.toml")
        );
        assert_eq!(log_path(), PathBuf::from("/tmp/locus-test-dir/locus.log"));

        std::env::remove_var("LOCUS_DIR");
    }
}
