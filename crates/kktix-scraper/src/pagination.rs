//! Order-list pagination via the `rel="next"` link of the pagination bar.
//!
//! The order-history list renders a Rails-style pagination bar under the
//! rows. The last page simply has no `rel="next"` anchor:
//!
//! ```text
//! <div class="pagination">
//!   <a rel="prev" href="/account/orders?page=1">‹ Prev</a>
//!   <a rel="next" href="/account/orders?page=3">Next ›</a>
//! </div>
//! ```
//!
//! The pager only answers "is there a next page?". Clicking the link and
//! waiting for the next page to settle is the collector's job.

use scraper::Html;

use crate::dom;

/// What the pager found on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSignal {
    HasNext,
    NoNext,
}

/// Looks for the "next page" control in a page snapshot.
#[must_use]
pub fn detect_next_page(document: &Html) -> PageSignal {
    if document.select(&dom::NEXT_PAGE).next().is_some() {
        PageSignal::HasNext
    } else {
        PageSignal::NoNext
    }
}

/// 1-based index of the page currently shown. Used for log output only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    index: u32,
}

impl PageState {
    #[must_use]
    pub fn new() -> Self {
        Self { index: 1 }
    }

    #[must_use]
    pub fn index(self) -> u32 {
        self.index
    }

    /// Records a successful move to the next page.
    pub fn advance(&mut self) {
        self.index = self.index.saturating_add(1);
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new()
    }
}
