use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "weather-report.log";
const DEFAULT_FILTER: &str = "warn";

/// Routes `tracing` output to `<dir>/weather-report.log`.
///
/// The TUI owns the terminal, so nothing is written to stdout/stderr.
/// `RUST_LOG` overrides the default `warn` filter.
pub fn init(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).context("creating log directory failed")?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {} failed", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow::anyhow!("installing log subscriber failed: {err}"))?;

    Ok(path)
}
