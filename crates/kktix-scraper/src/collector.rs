//! Order collection across all pages of the order-history list.
//!
//! The collector is a two-state machine: `Scanning` extracts the rows on
//! the page currently shown and advances through the pager; `Done` carries
//! the reason the walk ended. Records gathered before the end are always
//! returned, whatever that reason is.
//!
//! Failure handling per granularity:
//! - a row that cannot be extracted is logged and skipped;
//! - a failed event-time lookup is logged and the record kept as is;
//! - a page whose rows never appear ends the walk (treated as end of data);
//! - a lost session ends the walk and is reported as fatal.

use std::time::Duration;

use chrono::NaiveDateTime;
use scraper::Html;

use crate::dom::{NEXT_PAGE_CSS, ORDER_ROW_CSS};
use crate::enrich::{enrich, Enrichment};
use crate::error::{ScraperError, SessionError};
use crate::extract::{extract_row, order_rows};
use crate::output::orders_filename;
use crate::pagination::{detect_next_page, PageSignal, PageState};
use crate::session::Session;
use crate::types::OrderRecord;

/// Source of extraction timestamps and the output filename.
pub type Clock = fn() -> NaiveDateTime;

/// Local wall-clock time.
#[must_use]
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// How long to wait for the first row of each page.
    pub row_timeout: Duration,
    /// How long to wait for the event-time cell on a registration page.
    pub detail_timeout: Duration,
    /// Pause after clicking "next" before the new page is read.
    pub settle_delay: Duration,
    /// Open each order's registration page for the event time.
    pub enrich: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            row_timeout: Duration::from_secs(20),
            detail_timeout: Duration::from_secs(10),
            settle_delay: Duration::from_secs(2),
            enrich: true,
        }
    }
}

/// Why the page walk ended.
#[derive(Debug)]
pub enum StopReason {
    /// The last page had no "next" control.
    Exhausted,
    /// A page showed no order rows within the row timeout.
    NoRows(ScraperError),
    /// A browser command failed on the order list; the session may still work.
    PageError(ScraperError),
    /// The browser session became unusable.
    SessionLost(ScraperError),
}

impl StopReason {
    /// Only a lost session makes the whole run fail.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, StopReason::SessionLost(_))
    }

    fn from_session(page: PageState, err: SessionError) -> Self {
        if err.is_fatal() {
            StopReason::SessionLost(ScraperError::Session(err))
        } else if err.is_timeout() {
            StopReason::NoRows(ScraperError::PageWaitTimeout {
                page: page.index(),
                source: err,
            })
        } else {
            StopReason::PageError(ScraperError::Session(err))
        }
    }
}

/// Result of one collection run.
#[derive(Debug)]
pub struct Collection {
    pub orders: Vec<OrderRecord>,
    /// `orders_<YYYYMMDD_HHMMSS>.json`, stamped when the walk ended.
    pub json_filename: String,
    pub stop: StopReason,
}

/// Rows extracted from one page snapshot.
#[derive(Debug)]
pub struct PageScan {
    pub records: Vec<OrderRecord>,
    pub skipped: usize,
    pub signal: PageSignal,
}

/// Extracts every row from a page snapshot and reads the pager from the same
/// snapshot. Rows that fail extraction are logged and counted, not returned.
pub fn scan_page(html: &str, clock: Clock) -> PageScan {
    let document = Html::parse_document(html);
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (position, row) in order_rows(&document).enumerate() {
        match extract_row(row, clock()) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                tracing::warn!(row = position + 1, error = %e, "skipping order row");
            }
        }
    }

    PageScan {
        records,
        skipped,
        signal: detect_next_page(&document),
    }
}

enum CollectorState {
    Scanning,
    Done(StopReason),
}

pub struct Collector<'s, S> {
    session: &'s mut S,
    options: CollectOptions,
    clock: Clock,
    page: PageState,
    orders: Vec<OrderRecord>,
}

impl<'s, S: Session> Collector<'s, S> {
    /// The session must already show the first page of the order list.
    pub fn new(session: &'s mut S, options: CollectOptions) -> Self {
        Self {
            session,
            options,
            clock: local_now,
            page: PageState::new(),
            orders: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Walks every page and returns what was collected.
    ///
    /// Never fails: the end condition, including a lost session, is reported
    /// in [`Collection::stop`] next to the records gathered up to that point.
    pub async fn collect(mut self) -> Collection {
        let mut state = CollectorState::Scanning;
        let stop = loop {
            state = match state {
                CollectorState::Scanning => self.scan_current_page().await,
                CollectorState::Done(reason) => break reason,
            };
        };

        match &stop {
            StopReason::Exhausted => tracing::info!(page = self.page.index(), "reached last page"),
            StopReason::NoRows(e) => tracing::warn!(error = %e, "order list ended early"),
            StopReason::PageError(e) => {
                tracing::error!(page = self.page.index(), error = %e, "browser error on order list");
            }
            StopReason::SessionLost(e) => tracing::error!(error = %e, "browser session lost"),
        }
        tracing::info!(total = self.orders.len(), "total orders collected");

        Collection {
            json_filename: orders_filename((self.clock)()),
            orders: self.orders,
            stop,
        }
    }

    async fn scan_current_page(&mut self) -> CollectorState {
        let page = self.page;

        if let Err(e) = self
            .session
            .wait_for(ORDER_ROW_CSS, self.options.row_timeout)
            .await
        {
            return CollectorState::Done(StopReason::from_session(page, e));
        }

        let html = match self.session.source().await {
            Ok(html) => html,
            Err(e) => return CollectorState::Done(StopReason::from_session(page, e)),
        };

        tracing::info!(page = page.index(), "processing page");
        let scan = scan_page(&html, self.clock);
        if scan.skipped > 0 {
            tracing::warn!(page = page.index(), skipped = scan.skipped, "rows skipped on page");
        }

        for mut record in scan.records {
            if self.options.enrich {
                match enrich(self.session, &mut record, self.options.detail_timeout).await {
                    Ok(Enrichment::Enriched) => {
                        tracing::debug!(order = %record.order_number, "event time added");
                    }
                    Ok(Enrichment::NotApplicable | Enrichment::Failed) => {}
                    Err(e) => {
                        self.orders.push(record);
                        return CollectorState::Done(StopReason::SessionLost(e));
                    }
                }
            }
            tracing::info!(order = %record.order_number, "extracted order");
            self.orders.push(record);
        }

        match scan.signal {
            PageSignal::NoNext => CollectorState::Done(StopReason::Exhausted),
            PageSignal::HasNext => self.advance().await,
        }
    }

    async fn advance(&mut self) -> CollectorState {
        if let Err(e) = self.session.click(NEXT_PAGE_CSS).await {
            let reason = if e.is_fatal() {
                StopReason::SessionLost(ScraperError::Session(e))
            } else {
                StopReason::PageError(ScraperError::Session(e))
            };
            return CollectorState::Done(reason);
        }
        if !self.options.settle_delay.is_zero() {
            tokio::time::sleep(self.options.settle_delay).await;
        }
        self.page.advance();
        CollectorState::Scanning
    }
}
