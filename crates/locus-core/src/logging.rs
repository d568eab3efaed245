//! Logging setup for locus.
//!
//! The TUI owns the terminal while it runs, so logs go to a file rather than
//! stderr.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize file logging.
///
/// Uses `RUST_LOG` for filtering unless `level` is given. A bare level
/// (`debug`) applies to every locus crate; anything with a `=` or `,` is
/// taken as a full filter (`locus_tui=trace,warn`).
/// Default level: info
pub fn init_to_file(path: &Path, level: Option<&str>) -> crate::Result<()> {
    let filter = filter_for(level)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| crate::Error::Other(format!("logging already initialized: {e}")))
}

fn filter_for(level: Option<&str>) -> crate::Result<EnvFilter> {
    let Some(level) = level.map(str::trim) else {
        return Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("locus=info,locus_core=info,locus_tui=info")));
    };

    let directives = if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("locus={level},locus_core={level},locus_tui={level}")
    };

    EnvFilter::try_new(&directives)
        .map_err(|e| crate::Error::Config(format!("invalid log filter '{level}': {e}")))
}
