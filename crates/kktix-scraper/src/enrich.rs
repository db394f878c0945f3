//! Event-time lookup through the order's "Check/Edit Details" page.
//!
//! The order list does not show when an event takes place. The registration
//! page linked from the row's "Check/Edit Details" button does, in the first
//! cell of its event table:
//!
//! ```text
//! 2024/05/01 19:30(Wed) ~ 22:00(Wed) Add to Calendar
//! ```
//!
//! The calendar link text is dropped, the remainder is stored as
//! `"Event Time"` and the part before the first `~` as `"Start Time"`.

use std::time::Duration;

use scraper::Html;

use crate::dom::{self, element_text, EVENT_TIME_CELL_CSS};
use crate::error::{ScraperError, SessionError};
use crate::session::Session;
use crate::types::{DetailValue, Details, OrderRecord, EVENT_TIME_KEY, START_TIME_KEY};

/// Exact label of the action that links to the registration page.
pub const DETAILS_ACTION: &str = "Check/Edit Details";
const CALENDAR_LABEL: &str = "Add to Calendar";
const RANGE_SEPARATOR: char = '~';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTime {
    pub event_time: String,
    pub start_time: String,
}

/// What happened to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enrichment {
    Enriched,
    /// No enabled "Check/Edit Details" action with a URL.
    NotApplicable,
    /// The lookup failed; details were left untouched.
    Failed,
}

/// URL of the registration page, if the record has an enabled details action.
#[must_use]
pub fn detail_target(record: &OrderRecord) -> Option<&str> {
    record
        .action(DETAILS_ACTION)
        .filter(|a| !a.disabled)
        .and_then(|a| a.url.as_deref())
}

/// Cleans the captured cell text and splits off the start time.
#[must_use]
pub fn split_event_time(raw: &str) -> EventTime {
    let event_time = raw.replace(CALENDAR_LABEL, "").trim().to_string();
    let start_time = event_time
        .split_once(RANGE_SEPARATOR)
        .map_or(event_time.as_str(), |(start, _)| start)
        .trim()
        .to_string();
    EventTime {
        event_time,
        start_time,
    }
}

/// Text of the event-time cell in a registration page snapshot.
#[must_use]
pub fn read_event_time(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let cell = document.select(&dom::EVENT_TIME_CELL).next()?;
    Some(element_text(cell))
}

/// Adds `"Event Time"` and `"Start Time"` to `details`. Keys that already
/// exist are left as they are.
pub fn merge_event_time(details: &mut Details, time: EventTime) {
    details
        .entry(EVENT_TIME_KEY.to_string())
        .or_insert(DetailValue::PlainText(time.event_time));
    details
        .entry(START_TIME_KEY.to_string())
        .or_insert(DetailValue::PlainText(time.start_time));
}

/// Looks up the event time for `record` in a secondary tab and merges it
/// into the record's details.
///
/// The secondary tab is closed and the primary tab refocused on every path
/// once it has been opened. A failed lookup is logged and leaves the
/// record unchanged.
///
/// # Errors
///
/// Returns [`ScraperError::Session`] only when the session is lost, which
/// includes failing to close the secondary tab.
pub async fn enrich<S: Session>(
    session: &mut S,
    record: &mut OrderRecord,
    timeout: Duration,
) -> Result<Enrichment, ScraperError> {
    let Some(url) = detail_target(record).map(str::to_owned) else {
        return Ok(Enrichment::NotApplicable);
    };

    match lookup_event_time(session, &url, timeout).await {
        Ok(time) => {
            tracing::debug!(
                order = %record.order_number,
                start_time = %time.start_time,
                "parsed event time"
            );
            merge_event_time(&mut record.details, time);
            Ok(Enrichment::Enriched)
        }
        Err(source) if source.is_fatal() => Err(ScraperError::Session(source)),
        Err(source) => {
            let err = ScraperError::EnrichmentTimeout {
                order_number: record.order_number.clone(),
                source,
            };
            tracing::warn!(order = %record.order_number, error = %err, "could not read event time");
            Ok(Enrichment::Failed)
        }
    }
}

async fn lookup_event_time<S: Session>(
    session: &mut S,
    url: &str,
    timeout: Duration,
) -> Result<EventTime, SessionError> {
    session.open_tab(url).await?;
    let captured = capture_event_time(session, timeout).await;

    // Focus may still be on the detail tab; the order list cannot be trusted.
    if let Err(e) = session.close_tab().await {
        return Err(SessionError::Lost(format!(
            "could not return to the order list: {e}"
        )));
    }

    captured
}

async fn capture_event_time<S: Session>(
    session: &mut S,
    timeout: Duration,
) -> Result<EventTime, SessionError> {
    session.wait_for(EVENT_TIME_CELL_CSS, timeout).await?;
    let html = session.source().await?;
    let raw = read_event_time(&html).ok_or_else(|| SessionError::NoSuchElement {
        selector: EVENT_TIME_CELL_CSS.to_string(),
    })?;
    Ok(split_event_time(&raw))
}

#[cfg(test)]
#[path = "enrich_test.rs"]
mod tests;
