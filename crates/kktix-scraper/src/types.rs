//! Order records as scraped from the account's order-history list.
//!
//! ## JSON shape
//!
//! Field order in the output file follows the struct declaration order:
//! `order_number`, `thumbnail_url`, `event_title`, `event_url`, `details`,
//! `actions`, `timestamp`.
//!
//! `details` values are untagged: plain text is a JSON string, money is
//! `{"currency": "NT$", "amount": "500"}`, a receipt is
//! `{"number": "AB-12345678", "url": "https://..."}`. Deserialization picks
//! the variant from the shape, so a written file reads back unchanged.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Label shown in the row for the order total.
pub const AMOUNT_LABEL: &str = "Amount";
/// Label shown in the row for the invoice link.
pub const RECEIPT_LABEL: &str = "Receipt";
/// Added by the detail lookup: full time range text.
pub const EVENT_TIME_KEY: &str = "Event Time";
/// Added by the detail lookup: the part of the time range before `~`.
pub const START_TIME_KEY: &str = "Start Time";

/// Label → value pairs from a row's definition list, keyed by the literal
/// label text.
pub type Details = BTreeMap<String, DetailValue>;

/// One order row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Order number without the leading `#`.
    pub order_number: String,
    pub thumbnail_url: Option<String>,
    pub event_title: String,
    /// `None` when the event page is no longer linked from the row.
    pub event_url: Option<String>,
    pub details: Details,
    pub actions: Vec<ActionButton>,
    /// Local date-time at extraction, ISO-8601 with microseconds.
    pub timestamp: String,
}

impl OrderRecord {
    /// Finds an action button by its exact label.
    #[must_use]
    pub fn action(&self, text: &str) -> Option<&ActionButton> {
        self.actions.iter().find(|a| a.text == text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailValue {
    PlainText(String),
    Money { currency: String, amount: String },
    Receipt { number: String, url: String },
}

impl DetailValue {
    pub fn text(value: impl Into<String>) -> Self {
        DetailValue::PlainText(value.into())
    }

    #[cfg(test)]
    pub(crate) fn as_text(&self) -> Option<&str> {
        match self {
            DetailValue::PlainText(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for DetailValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailValue::PlainText(s) => f.write_str(s),
            DetailValue::Money { currency, amount } => write!(f, "{currency}{amount}"),
            DetailValue::Receipt { number, .. } => f.write_str(number),
        }
    }
}

/// A button or link in the row's action column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    pub text: String,
    pub url: Option<String>,
    /// `true` iff the element carries a `disabled` attribute, whatever its value.
    pub disabled: bool,
}

/// How the event title is rendered in a row.
///
/// Events that are still listed link to their page; removed or private
/// events show the title as bare text. A link without `href` still marks
/// the title: its own text is the title and the URL is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleShape {
    Linked { title: String, url: Option<String> },
    Plain { title: String },
}

impl TitleShape {
    #[must_use]
    pub fn into_parts(self) -> (String, Option<String>) {
        match self {
            TitleShape::Linked { title, url } => (title, url),
            TitleShape::Plain { title } => (title, None),
        }
    }
}
