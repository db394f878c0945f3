use chrono::NaiveDate;
use scraper::{Html, Selector};

use super::*;

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_micro_opt(12, 30, 5, 42)
        .unwrap()
}

fn parse(html: &str) -> Html {
    Html::parse_fragment(html)
}

fn row(doc: &Html) -> ElementRef<'_> {
    order_rows(doc).next().expect("fixture has a row")
}

const LINKED_ROW: &str = r#"
<div class="accounting-row">
  <div class="col-order"><span class="subrow">#123</span></div>
  <img class="thumb" src="https://assets.kktix.io/a.jpg">
  <div class="event-title">
    <h4 class="subrow"><a href="https://kktix.com/events/concert-a">Concert A</a></h4>
  </div>
  <dl class="item">
    <dt>Amount</dt><dd><span class="price">Free</span></dd>
    <dt>State</dt><dd>  Paid  </dd>
    <dt>Receipt</dt><dd><a href="https://kktix.com/receipts/9">AB-12345678</a></dd>
  </dl>
  <div class="col-action">
    <a class="btn" href="https://kktix.com/events/concert-a/registrations/1">Check/Edit Details</a>
    <a class="btn" href="https://kktix.com/cancel/1" disabled="false">Cancel</a>
  </div>
</div>
"#;

#[test]
fn extract_row_reads_every_field() {
    let doc = parse(LINKED_ROW);
    let record = extract_row(row(&doc), at()).unwrap();

    assert_eq!(record.order_number, "123");
    assert_eq!(
        record.thumbnail_url.as_deref(),
        Some("https://assets.kktix.io/a.jpg")
    );
    assert_eq!(record.event_title, "Concert A");
    assert_eq!(
        record.event_url.as_deref(),
        Some("https://kktix.com/events/concert-a")
    );
    assert_eq!(record.details.len(), 3);
    assert_eq!(record.details["State"], DetailValue::text("Paid"));
    assert_eq!(record.timestamp, "2024-05-01T12:30:05.000042");
}

#[test]
fn order_number_strips_only_one_leading_marker() {
    let doc = parse(r#"<div class="accounting-row"><span class="subrow">##77#</span></div>"#);
    assert_eq!(extract_order_number(row(&doc)).unwrap(), "#77#");
}

#[test]
fn order_number_without_marker_is_kept() {
    let doc = parse(r#"<div class="accounting-row"><span class="subrow"> 555 </span></div>"#);
    assert_eq!(extract_order_number(row(&doc)).unwrap(), "555");
}

#[test]
fn missing_order_number_is_a_row_error() {
    let doc = parse(r#"<div class="accounting-row"><img class="thumb" src="x"></div>"#);
    let err = extract_row(row(&doc), at()).unwrap_err();
    assert!(
        matches!(err, ScraperError::RowExtraction { field: "order_number", .. }),
        "expected order_number row error, got: {err:?}"
    );
}

#[test]
fn missing_thumbnail_element_is_a_row_error() {
    let doc = parse(LINKED_ROW.replace(r#"<img class="thumb" src="https://assets.kktix.io/a.jpg">"#, "").as_str());
    let err = extract_row(row(&doc), at()).unwrap_err();
    assert!(matches!(
        err,
        ScraperError::RowExtraction {
            field: "thumbnail_url",
            ..
        }
    ));
}

#[test]
fn thumbnail_without_src_is_none() {
    let doc = parse(r#"<div class="accounting-row"><img class="thumb"></div>"#);
    assert_eq!(extract_thumbnail(row(&doc)).unwrap(), None);
}

#[test]
fn linked_title_yields_url() {
    let doc = parse(LINKED_ROW);
    assert_eq!(
        resolve_title(row(&doc)).unwrap(),
        TitleShape::Linked {
            title: "Concert A".into(),
            url: Some("https://kktix.com/events/concert-a".into()),
        }
    );
}

#[test]
fn link_without_href_keeps_only_link_text() {
    let doc = parse(
        r#"<div class="accounting-row">
             <div class="event-title">
               <h4 class="subrow"><a>Concert</a> <small>Sold</small></h4>
             </div>
           </div>"#,
    );
    assert_eq!(
        resolve_title(row(&doc)).unwrap(),
        TitleShape::Linked {
            title: "Concert".into(),
            url: None,
        }
    );
    assert_eq!(
        resolve_title(row(&doc)).unwrap().into_parts(),
        ("Concert".to_string(), None)
    );
}

#[test]
fn plain_title_has_no_url() {
    let doc = parse(
        r#"<div class="accounting-row">
             <div class="event-title"><h4 class="subrow"> 已下架的活動 </h4></div>
           </div>"#,
    );
    assert_eq!(
        resolve_title(row(&doc)).unwrap(),
        TitleShape::Plain {
            title: "已下架的活動".into()
        }
    );
}

#[test]
fn missing_title_block_is_a_row_error() {
    let doc = parse(r#"<div class="accounting-row"><h4 class="subrow">Loose</h4></div>"#);
    let err = resolve_title(row(&doc)).unwrap_err();
    assert!(matches!(
        err,
        ScraperError::RowExtraction {
            field: "event_title",
            ..
        }
    ));
}

#[test]
fn free_amount_collapses_to_plain_text() {
    let doc = parse(
        r#"<div class="accounting-row"><dl class="item">
             <dt>Amount</dt>
             <dd><span class="price"><span class="currency">NT$</span> Free </span></dd>
           </dl></div>"#,
    );
    let details = extract_details(row(&doc)).unwrap();
    assert_eq!(details[AMOUNT_LABEL], DetailValue::PlainText("Free".into()));
}

#[test]
fn priced_amount_is_money() {
    let doc = parse(
        r#"<div class="accounting-row"><dl class="item">
             <dt>Amount</dt>
             <dd><span class="price"><span class="currency">NT$</span><span class="currency-value">1,280</span></span></dd>
           </dl></div>"#,
    );
    let details = extract_details(row(&doc)).unwrap();
    let amount = &details[AMOUNT_LABEL];
    assert_eq!(
        amount,
        &DetailValue::Money {
            currency: "NT$".into(),
            amount: "1,280".into()
        }
    );
    assert_eq!(amount.to_string(), "NT$1,280");
}

#[test]
fn amount_without_price_is_a_row_error() {
    let doc = parse(
        r#"<div class="accounting-row"><dl class="item">
             <dt>Amount</dt><dd>500</dd>
           </dl></div>"#,
    );
    let err = extract_details(row(&doc)).unwrap_err();
    assert!(matches!(err, ScraperError::RowExtraction { field: "Amount", .. }));
}

#[test]
fn amount_without_currency_value_is_a_row_error() {
    let doc = parse(
        r#"<div class="accounting-row"><dl class="item">
             <dt>Amount</dt><dd><span class="price"><span class="currency">NT$</span></span></dd>
           </dl></div>"#,
    );
    assert!(extract_details(row(&doc)).is_err());
}

#[test]
fn receipt_is_number_and_url() {
    let doc = parse(LINKED_ROW);
    let details = extract_details(row(&doc)).unwrap();
    assert_eq!(
        details[RECEIPT_LABEL],
        DetailValue::Receipt {
            number: "AB-12345678".into(),
            url: "https://kktix.com/receipts/9".into()
        }
    );
}

#[test]
fn receipt_without_link_is_a_row_error() {
    let doc = parse(
        r#"<div class="accounting-row"><dl class="item">
             <dt>Receipt</dt><dd>pending</dd>
           </dl></div>"#,
    );
    let err = extract_details(row(&doc)).unwrap_err();
    assert!(matches!(err, ScraperError::RowExtraction { field: "Receipt", .. }));
}

#[test]
fn missing_item_list_is_a_row_error() {
    let doc = parse(r#"<div class="accounting-row"></div>"#);
    assert!(matches!(
        extract_details(row(&doc)).unwrap_err(),
        ScraperError::RowExtraction { field: "details", .. }
    ));
}

#[test]
fn unequal_label_and_value_counts_truncate_to_shorter() {
    let more_labels = parse(
        r#"<dl class="item">
             <dt>State</dt><dd>Paid</dd>
             <dt>Tickets</dt><dd>2</dd>
             <dt>Event Host</dt>
           </dl>"#,
    );
    let more_values = parse(
        r#"<dl class="item">
             <dt>State</dt><dd>Paid</dd>
             <dd>orphan</dd><dd>another orphan</dd>
           </dl>"#,
    );
    let dt = Selector::parse("dt").unwrap();
    let dd = Selector::parse("dd").unwrap();

    for (doc, expected) in [(&more_labels, 2), (&more_values, 1)] {
        let labels: Vec<_> = doc.select(&dt).collect();
        let values: Vec<_> = doc.select(&dd).collect();
        let details = pair_details(&labels, &values).unwrap();
        assert_eq!(details.len(), labels.len().min(values.len()));
        assert_eq!(details.len(), expected);
    }
}

#[test]
fn other_labels_keep_their_literal_text() {
    let doc = parse(
        r#"<div class="accounting-row"><dl class="item">
             <dt>Event Location</dt><dd>台北小巨蛋
                 Taipei Arena</dd>
           </dl></div>"#,
    );
    let details = extract_details(row(&doc)).unwrap();
    assert_eq!(
        details["Event Location"].as_text(),
        Some("台北小巨蛋 Taipei Arena")
    );
}

#[test]
fn disabled_is_presence_of_attribute_not_its_value() {
    let doc = parse(LINKED_ROW);
    let actions = extract_actions(row(&doc));
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0].text, "Check/Edit Details");
    assert!(!actions[0].disabled);
    assert_eq!(actions[1].text, "Cancel");
    assert!(actions[1].disabled, "disabled=\"false\" is still present");
}

#[test]
fn action_without_href_has_no_url() {
    let doc = parse(
        r#"<div class="accounting-row"><div class="col-action">
             <button class="btn" disabled>Refund</button>
           </div></div>"#,
    );
    let actions = extract_actions(row(&doc));
    assert_eq!(
        actions,
        vec![ActionButton {
            text: "Refund".into(),
            url: None,
            disabled: true
        }]
    );
}

#[test]
fn buttons_outside_the_action_column_are_ignored() {
    let doc = parse(
        r#"<div class="accounting-row">
             <a class="btn" href="/elsewhere">Share</a>
             <div class="col-action"><a class="btn" href="/r">View</a></div>
           </div>"#,
    );
    let actions = extract_actions(row(&doc));
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].text, "View");
}
