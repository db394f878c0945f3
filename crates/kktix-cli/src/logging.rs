//! Console and file logging for a run.
//!
//! Each run logs to stdout and to its own `scraper_<YYYYMMDD_HHMMSS>.log` in
//! the configured log directory. `RUST_LOG` overrides the level chosen from
//! `KKTIX_DEBUG`.

use std::path::Path;

use chrono::NaiveDateTime;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub(crate) fn log_file_name(at: NaiveDateTime) -> String {
    format!("scraper_{}.log", at.format("%Y%m%d_%H%M%S"))
}

pub(crate) fn default_directives(debug: bool) -> &'static str {
    if debug {
        "info,kktix_orders=debug,kktix_scraper=debug,kktix_core=debug"
    } else {
        "info"
    }
}

/// Installs the global subscriber. The returned guard flushes the log file
/// when dropped and must be held until the run ends.
pub(crate) fn init_logging(log_dir: &Path, debug: bool) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_name = log_file_name(chrono::Local::now().naive_local());
    let appender = tracing_appender::rolling::never(log_dir, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(debug)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()?;

    Ok(guard)
}
