//! Field extraction for one `.accounting-row` of the order-history list.
//!
//! Every function here reads from a parsed snapshot of the page; nothing
//! touches the live browser. A missing required sub-element produces
//! [`ScraperError::RowExtraction`], which the collector logs and skips.

use chrono::NaiveDateTime;
use scraper::{ElementRef, Html};

use crate::dom::{self, attr, element_text, first};
use crate::error::ScraperError;
use crate::types::{
    ActionButton, DetailValue, Details, OrderRecord, TitleShape, AMOUNT_LABEL, RECEIPT_LABEL,
};

/// Leading character the site prints in front of order numbers.
const ORDER_NUMBER_MARKER: char = '#';
/// Price text shown for zero-cost registrations.
const FREE_MARKER: &str = "Free";

/// All order rows in document order.
pub fn order_rows(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document.select(&dom::ORDER_ROW)
}

/// Extracts a complete [`OrderRecord`] from one row.
///
/// `extracted_at` becomes the record's `timestamp`.
///
/// # Errors
///
/// Returns [`ScraperError::RowExtraction`] when the order number, thumbnail,
/// title block or detail list is missing, or when an `Amount`/`Receipt`
/// value lacks its expected inner markup.
pub fn extract_row(
    row: ElementRef<'_>,
    extracted_at: NaiveDateTime,
) -> Result<OrderRecord, ScraperError> {
    let order_number = extract_order_number(row)?;
    let thumbnail_url = extract_thumbnail(row)?;
    let (event_title, event_url) = resolve_title(row)?.into_parts();
    let details = extract_details(row)?;
    let actions = extract_actions(row);

    Ok(OrderRecord {
        order_number,
        thumbnail_url,
        event_title,
        event_url,
        details,
        actions,
        timestamp: format_timestamp(extracted_at),
    })
}

/// Text of the row's first `.subrow`, with one leading `#` removed.
///
/// # Errors
///
/// Returns [`ScraperError::RowExtraction`] if no `.subrow` exists.
pub fn extract_order_number(row: ElementRef<'_>) -> Result<String, ScraperError> {
    let el = first(row, &dom::SUBROW)
        .ok_or_else(|| ScraperError::row("order_number", "no .subrow element"))?;
    let text = element_text(el);
    let number = text.strip_prefix(ORDER_NUMBER_MARKER).unwrap_or(&text);
    Ok(number.trim_start().to_string())
}

/// `src` of the row's `.thumb` image. The image element is required; a
/// missing `src` attribute yields `None`.
///
/// # Errors
///
/// Returns [`ScraperError::RowExtraction`] if no `.thumb` element exists.
pub fn extract_thumbnail(row: ElementRef<'_>) -> Result<Option<String>, ScraperError> {
    let el = first(row, &dom::THUMB)
        .ok_or_else(|| ScraperError::row("thumbnail_url", "no .thumb element"))?;
    Ok(attr(el, "src"))
}

/// Resolves the title block to a [`TitleShape`], checking for a link child
/// before falling back to the block's own text.
///
/// # Errors
///
/// Returns [`ScraperError::RowExtraction`] if the `.event-title h4.subrow`
/// block is absent.
pub fn resolve_title(row: ElementRef<'_>) -> Result<TitleShape, ScraperError> {
    let heading = first(row, &dom::EVENT_TITLE)
        .ok_or_else(|| ScraperError::row("event_title", "no .event-title h4.subrow element"))?;

    if let Some(link) = first(heading, &dom::LINK) {
        return Ok(TitleShape::Linked {
            title: element_text(link),
            url: attr(link, "href"),
        });
    }

    Ok(TitleShape::Plain {
        title: element_text(heading),
    })
}

/// Builds the label → value mapping from the row's `.item` definition list.
///
/// # Errors
///
/// Returns [`ScraperError::RowExtraction`] if `.item` is absent or a value
/// cannot be read (see [`pair_details`]).
pub fn extract_details(row: ElementRef<'_>) -> Result<Details, ScraperError> {
    let list = first(row, &dom::ITEM_LIST)
        .ok_or_else(|| ScraperError::row("details", "no .item element"))?;
    let labels: Vec<ElementRef<'_>> = list.select(&dom::LABEL).collect();
    let values: Vec<ElementRef<'_>> = list.select(&dom::VALUE).collect();
    pair_details(&labels, &values)
}

/// Pairs label and value elements by position: the n-th `dt` with the n-th
/// `dd`.
///
/// When the two sequences differ in length only the first
/// `min(labels.len(), values.len())` pairs are produced and the surplus
/// elements are dropped without error.
///
/// A repeated label keeps the value of its last occurrence.
///
/// # Errors
///
/// Returns [`ScraperError::RowExtraction`] if an `Amount` or `Receipt` value
/// lacks its inner markup.
pub fn pair_details(
    labels: &[ElementRef<'_>],
    values: &[ElementRef<'_>],
) -> Result<Details, ScraperError> {
    let mut details = Details::new();
    for (dt, dd) in labels.iter().zip(values) {
        let label = element_text(*dt);
        let value = detail_value(&label, *dd)?;
        details.insert(label, value);
    }
    Ok(details)
}

fn detail_value(label: &str, dd: ElementRef<'_>) -> Result<DetailValue, ScraperError> {
    match label {
        AMOUNT_LABEL => amount_value(dd),
        RECEIPT_LABEL => receipt_value(dd),
        _ => Ok(DetailValue::PlainText(element_text(dd))),
    }
}

fn amount_value(dd: ElementRef<'_>) -> Result<DetailValue, ScraperError> {
    let price =
        first(dd, &dom::PRICE).ok_or_else(|| ScraperError::row("Amount", "no .price element"))?;

    if element_text(price).contains(FREE_MARKER) {
        return Ok(DetailValue::text(FREE_MARKER));
    }

    let currency = first(price, &dom::CURRENCY)
        .ok_or_else(|| ScraperError::row("Amount", "no .currency element"))?;
    let amount = first(price, &dom::CURRENCY_VALUE)
        .ok_or_else(|| ScraperError::row("Amount", "no .currency-value element"))?;

    Ok(DetailValue::Money {
        currency: element_text(currency),
        amount: element_text(amount),
    })
}

fn receipt_value(dd: ElementRef<'_>) -> Result<DetailValue, ScraperError> {
    let link = first(dd, &dom::LINK).ok_or_else(|| ScraperError::row("Receipt", "no link"))?;
    let url = attr(link, "href").ok_or_else(|| ScraperError::row("Receipt", "link has no href"))?;
    Ok(DetailValue::Receipt {
        number: element_text(link),
        url,
    })
}

/// Every `.col-action .btn` in document order.
pub fn extract_actions(row: ElementRef<'_>) -> Vec<ActionButton> {
    row.select(&dom::ACTION_BUTTON)
        .map(|btn| ActionButton {
            text: element_text(btn),
            url: attr(btn, "href"),
            disabled: btn.value().attr("disabled").is_some(),
        })
        .collect()
}

/// ISO-8601 local date-time with microsecond precision, no offset.
#[must_use]
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
