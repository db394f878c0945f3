//! The browser port used by the collector and the detail lookup.
//!
//! Implemented for real browsers by [`crate::WebDriverSession`]; tests drive
//! the collector with an in-memory implementation over static HTML.
//!
//! A session has one primary tab (the order list) and at most one secondary
//! tab open at a time. Every `open_tab` must be paired with a `close_tab`
//! before the primary tab is used again.

use std::time::Duration;

use crate::error::SessionError;

// Futures are awaited in place on a single task; none need to be `Send`.
#[allow(async_fn_in_trait)]
pub trait Session {
    /// Waits until at least one element matches `css` in the focused tab.
    ///
    /// # Errors
    ///
    /// [`SessionError::Timeout`] when nothing matches within `timeout`.
    async fn wait_for(&mut self, css: &str, timeout: Duration) -> Result<(), SessionError>;

    /// HTML of the document in the focused tab.
    ///
    /// # Errors
    ///
    /// Any browser failure.
    async fn source(&mut self) -> Result<String, SessionError>;

    /// Clicks the first element matching `css` in the focused tab.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoSuchElement`] when nothing matches.
    async fn click(&mut self, css: &str) -> Result<(), SessionError>;

    /// Opens `url` in a new tab and focuses it.
    ///
    /// # Errors
    ///
    /// Any browser failure. The implementation must leave focus on the
    /// primary tab when it fails.
    async fn open_tab(&mut self, url: &str) -> Result<(), SessionError>;

    /// Closes the focused secondary tab and focuses the primary tab again.
    ///
    /// # Errors
    ///
    /// Any browser failure.
    async fn close_tab(&mut self) -> Result<(), SessionError>;
}
