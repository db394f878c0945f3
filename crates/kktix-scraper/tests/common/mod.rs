//! In-memory browser for collector tests.
//!
//! Serves a fixed list of order-list pages in the primary tab and a map of
//! registration pages for secondary tabs. Selectors are evaluated against
//! the served HTML with `scraper`, the same way the production code reads
//! page snapshots.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use scraper::{Html, Selector};

use kktix_scraper::{Session, SessionError};

pub fn fixed_clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_micro_opt(12, 0, 0, 7))
        .expect("valid fixture date")
}

fn matches(html: &str, css: &str) -> bool {
    let selector = Selector::parse(css).expect("valid selector");
    Html::parse_document(html).select(&selector).next().is_some()
}

/// One order row. `amount` is the inner HTML of the `.price` span.
pub fn row(number: &str, title: &str, amount: &str, details_url: Option<&str>) -> String {
    let action = details_url.map_or_else(
        || r#"<a class="btn" disabled>Check/Edit Details</a>"#.to_string(),
        |url| format!(r#"<a class="btn" href="{url}">Check/Edit Details</a>"#),
    );
    format!(
        r#"<div class="accounting-row">
             <div class="col-order"><span class="subrow">#{number}</span></div>
             <img class="thumb" src="https://assets.kktix.io/{number}.jpg">
             <div class="event-title">
               <h4 class="subrow"><a href="https://kktix.com/events/{number}">{title}</a></h4>
             </div>
             <dl class="item">
               <dt>Amount</dt><dd><span class="price">{amount}</span></dd>
               <dt>Date</dt><dd>2024/04/20</dd>
             </dl>
             <div class="col-action">{action}</div>
           </div>"#
    )
}

pub const FREE: &str = "Free";
pub const NT_500: &str =
    r#"<span class="currency">NT$</span><span class="currency-value">500</span>"#;

/// An order-list page with the given rows.
pub fn page(rows: &[String], has_next: bool) -> String {
    let next = if has_next {
        r#"<a rel="next" href="/account/orders?page=2">Next</a>"#
    } else {
        ""
    };
    format!(
        r##"<html><body>
             <div id="orders">{}</div>
             <div class="pagination"><a rel="prev" href="#">Prev</a>{next}</div>
           </body></html>"##,
        rows.join("\n")
    )
}

/// A registration page showing `cell` as the event time.
pub fn registration_page(cell: &str) -> String {
    format!(
        r#"<html><body>
           <div id="registrations_controller">
             <div>
               <div class="header">Registration</div>
               <div><div><div><div>
                 <table><tbody><tr><td>{cell} <a href="/cal.ics">Add to Calendar</a></td></tr></tbody></table>
               </div></div></div></div>
             </div>
           </div>
           </body></html>"#
    )
}

#[derive(Default)]
pub struct FakeSession {
    pub pages: Vec<String>,
    pub current: usize,
    pub registrations: HashMap<String, String>,
    /// Every secondary tab shows a page without the event-time cell.
    pub detail_timeouts: bool,
    /// Clicking "next" on this 0-based page loses the session.
    pub lose_on_click_from: Option<usize>,
    pub tab: Option<String>,
    pub opened: Vec<String>,
    pub clicks: usize,
}

impl FakeSession {
    pub fn with_pages(pages: Vec<String>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    fn focused(&self) -> &str {
        match &self.tab {
            Some(html) => html,
            None => self.pages.get(self.current).map_or("", String::as_str),
        }
    }
}

impl Session for FakeSession {
    async fn wait_for(&mut self, css: &str, timeout: Duration) -> Result<(), SessionError> {
        if matches(self.focused(), css) {
            Ok(())
        } else {
            Err(SessionError::Timeout {
                selector: css.to_string(),
                timeout,
            })
        }
    }

    async fn source(&mut self) -> Result<String, SessionError> {
        Ok(self.focused().to_string())
    }

    async fn click(&mut self, css: &str) -> Result<(), SessionError> {
        if self.lose_on_click_from == Some(self.current) {
            return Err(SessionError::Lost("chrome not reachable".into()));
        }
        if !matches(self.focused(), css) {
            return Err(SessionError::NoSuchElement {
                selector: css.to_string(),
            });
        }
        self.clicks += 1;
        self.current += 1;
        Ok(())
    }

    async fn open_tab(&mut self, url: &str) -> Result<(), SessionError> {
        assert!(self.tab.is_none(), "secondary tab already open");
        self.opened.push(url.to_string());
        let html = if self.detail_timeouts {
            "<html><body><p>Loading...</p></body></html>".to_string()
        } else {
            self.registrations.get(url).cloned().unwrap_or_default()
        };
        self.tab = Some(html);
        Ok(())
    }

    async fn close_tab(&mut self) -> Result<(), SessionError> {
        self.tab = None;
        Ok(())
    }
}
