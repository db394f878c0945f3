use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure reported by a [`crate::Session`] implementation.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("timed out after {timeout:?} waiting for `{selector}`")]
    Timeout { selector: String, timeout: Duration },

    #[error("no element matches `{selector}`")]
    NoSuchElement { selector: String },

    /// A single browser command failed; the session is still usable.
    #[error("browser command failed: {0}")]
    Command(String),

    /// The session itself is gone (driver crashed, window lost, connection
    /// dropped). Nothing further can be done with it.
    #[error("browser session lost: {0}")]
    Lost(String),
}

impl SessionError {
    /// Returns `true` when the session can no longer be used.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::Lost(_))
    }

    /// Returns `true` for bounded-wait expiry.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, SessionError::Timeout { .. })
    }
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("row extraction failed at {field}: {reason}")]
    RowExtraction { field: &'static str, reason: String },

    #[error("no order rows on page {page}: {source}")]
    PageWaitTimeout {
        page: u32,
        #[source]
        source: SessionError,
    },

    #[error("detail lookup failed for order {order_number}: {source}")]
    EnrichmentTimeout {
        order_number: String,
        #[source]
        source: SessionError,
    },

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("could not start WebDriver session at {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("login failed: {reason}")]
    Login { reason: String },

    #[error("JSON error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScraperError {
    pub(crate) fn row(field: &'static str, reason: impl Into<String>) -> Self {
        ScraperError::RowExtraction {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScraperError::Io {
            path: path.into(),
            source,
        }
    }
}
