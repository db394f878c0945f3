//! JSON output of a collection run.
//!
//! The file is a pretty-printed array of [`OrderRecord`]s, written as UTF-8
//! with non-ASCII text left unescaped so event titles stay readable.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::ScraperError;
use crate::types::OrderRecord;

const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `orders_<YYYYMMDD_HHMMSS>.json`
#[must_use]
pub fn orders_filename(at: NaiveDateTime) -> String {
    format!("orders_{}.json", at.format(STAMP_FORMAT))
}

/// `dumps_<YYYYMMDD_HHMMSS>`, the per-run directory for output files.
#[must_use]
pub fn run_dir_name(at: NaiveDateTime) -> String {
    format!("dumps_{}", at.format(STAMP_FORMAT))
}

/// Serializes records in collection order.
///
/// # Errors
///
/// Returns [`ScraperError::Serialize`] if serialization fails.
pub fn to_json(orders: &[OrderRecord]) -> Result<String, ScraperError> {
    Ok(serde_json::to_string_pretty(orders)?)
}

/// Writes `orders` to `dir/filename`, creating `dir` if needed, and returns
/// the written path.
///
/// # Errors
///
/// Returns [`ScraperError::Io`] if the directory or file cannot be written.
pub fn write_orders(
    dir: &Path,
    filename: &str,
    orders: &[OrderRecord],
) -> Result<PathBuf, ScraperError> {
    fs::create_dir_all(dir).map_err(|e| ScraperError::io(dir, e))?;
    let path = dir.join(filename);
    let json = to_json(orders)?;
    fs::write(&path, json).map_err(|e| ScraperError::io(&path, e))?;
    tracing::info!(path = %path.display(), count = orders.len(), "saved orders");
    Ok(path)
}

/// Reads back a file written by [`write_orders`].
///
/// # Errors
///
/// Returns [`ScraperError::Io`] if the file cannot be read, or
/// [`ScraperError::Serialize`] if it is not an order array.
pub fn read_orders(path: &Path) -> Result<Vec<OrderRecord>, ScraperError> {
    let raw = fs::read_to_string(path).map_err(|e| ScraperError::io(path, e))?;
    Ok(serde_json::from_str(&raw)?)
}
