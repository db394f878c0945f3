//! Fixed selectors for the order-history and registration pages, plus the
//! text helpers shared by the extractor, the pager and the detail lookup.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

/// One order in the order-history list.
pub const ORDER_ROW_CSS: &str = ".accounting-row";
/// The "next page" link of the order-history pagination bar.
pub const NEXT_PAGE_CSS: &str = ".pagination a[rel='next']";
/// First time cell of the event table on a registration page.
pub const EVENT_TIME_CELL_CSS: &str = "#registrations_controller > div:nth-of-type(1) > div:nth-of-type(2) > div > div:nth-of-type(1) > div > table > tbody > tr:nth-of-type(1) > td";

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

pub(crate) static ORDER_ROW: LazyLock<Selector> = LazyLock::new(|| selector(ORDER_ROW_CSS));
pub(crate) static NEXT_PAGE: LazyLock<Selector> = LazyLock::new(|| selector(NEXT_PAGE_CSS));
pub(crate) static EVENT_TIME_CELL: LazyLock<Selector> =
    LazyLock::new(|| selector(EVENT_TIME_CELL_CSS));

pub(crate) static SUBROW: LazyLock<Selector> = LazyLock::new(|| selector(".subrow"));
pub(crate) static THUMB: LazyLock<Selector> = LazyLock::new(|| selector(".thumb"));
pub(crate) static EVENT_TITLE: LazyLock<Selector> =
    LazyLock::new(|| selector(".event-title h4.subrow"));
pub(crate) static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));
pub(crate) static ITEM_LIST: LazyLock<Selector> = LazyLock::new(|| selector(".item"));
pub(crate) static LABEL: LazyLock<Selector> = LazyLock::new(|| selector("dt"));
pub(crate) static VALUE: LazyLock<Selector> = LazyLock::new(|| selector("dd"));
pub(crate) static PRICE: LazyLock<Selector> = LazyLock::new(|| selector(".price"));
pub(crate) static CURRENCY: LazyLock<Selector> = LazyLock::new(|| selector(".currency"));
pub(crate) static CURRENCY_VALUE: LazyLock<Selector> =
    LazyLock::new(|| selector(".currency-value"));
pub(crate) static ACTION_BUTTON: LazyLock<Selector> =
    LazyLock::new(|| selector(".col-action .btn"));

/// Rendered-text approximation: all descendant text nodes joined, runs of
/// whitespace collapsed to a single space, ends trimmed.
#[must_use]
pub fn element_text(el: ElementRef<'_>) -> String {
    let raw: String = el.text().collect();
    collapse_whitespace(&raw)
}

pub(crate) fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First descendant of `el` matching `sel`.
pub(crate) fn first<'a>(el: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    el.select(sel).next()
}

/// Attribute value, `None` when the attribute is absent.
pub(crate) fn attr(el: ElementRef<'_>, name: &str) -> Option<String> {
    el.value().attr(name).map(str::to_owned)
}
