//! locus - incremental search over a locate database.

use anyhow::{Context, Result};
use clap::Parser;
use locus_core::build_info::BUILD_INFO;
use locus_core::{logging, paths, Config};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "locus")]
#[command(about = "Search a locate database interactively", long_about = None)]
#[command(disable_version_flag = true)]
struct Args {
    /// Pattern to search for on startup
    pattern: Option<String>,

    /// Maximum number of results per query (0 = no cap)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Only show results under this directory
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Config file (defaults to $LOCUS_DIR/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `locus_tui=trace`
    #[arg(long)]
    log_level: Option<String>,

    /// Print version and build information
    #[arg(short = 'V', long)]
    version: bool,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&paths::config_path())?,
    };

    if let Some(limit) = args.limit {
        config.query.limit = limit;
    }
    if let Some(dir) = &args.dir {
        config.filter.dir = Some(Config::expand_path(dir));
    }
    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args).context("failed to load configuration")?;

    logging::init_to_file(&paths::log_path(), args.log_level.as_deref())
        .context("failed to initialize logging")?;
    info!(version = BUILD_INFO.version, "starting locus");

    let outcome = locus_tui::run(&config, args.pattern.as_deref())?;
    if let Some(path) = outcome.print {
        println!("{path}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if args.version {
        println!("{}", BUILD_INFO.version_line("locus"));
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("locus: {e:#}");
            ExitCode::FAILURE
        }
    }
}
