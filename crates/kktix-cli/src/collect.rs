//! Command handlers that drive a browser session.
//!
//! Both handlers close the browser before returning, whatever the outcome.
//! A collection that ends because the session was lost still writes the
//! orders gathered so far before reporting the failure.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDateTime;
use kktix_core::AppConfig;
use kktix_scraper::collector::local_now;
use kktix_scraper::{
    run_dir_name, to_json, write_orders, BrowserOptions, CollectOptions, Collector, Session,
    StopReason, WebDriverSession,
};

use crate::timeline;
use crate::CollectArgs;

pub(crate) fn collect_options(config: &AppConfig, args: &CollectArgs) -> CollectOptions {
    CollectOptions {
        row_timeout: Duration::from_secs(config.page_timeout_secs),
        detail_timeout: Duration::from_secs(config.detail_timeout_secs),
        settle_delay: Duration::from_millis(config.settle_delay_ms),
        enrich: !args.skip_details,
    }
}

pub(crate) fn browser_options(config: &AppConfig, headless: Option<bool>) -> BrowserOptions {
    BrowserOptions {
        webdriver_url: config.webdriver_url.clone(),
        headless: headless.unwrap_or(config.headless),
    }
}

pub(crate) fn dump_page_path(config: &AppConfig, at: NaiveDateTime) -> PathBuf {
    config
        .output_dir
        .join("dumps")
        .join(format!("orders_page_{}.html", at.format("%Y%m%d_%H%M%S")))
}

async fn signed_in_session(
    config: &AppConfig,
    headless: Option<bool>,
) -> anyhow::Result<WebDriverSession> {
    let credentials = config.credentials()?;
    let mut session = WebDriverSession::connect(&browser_options(config, headless)).await?;

    let page_timeout = Duration::from_secs(config.page_timeout_secs);
    if let Err(e) = session
        .login(&credentials, &config.login_url(), &config.orders_url(), page_timeout)
        .await
    {
        session.quit().await;
        return Err(e.into());
    }
    Ok(session)
}

/// Logs in, walks the order list and writes `orders_<ts>.json` (and the
/// timeline unless disabled) into a fresh `dumps_<ts>` directory.
///
/// # Errors
///
/// Returns an error if credentials are missing, the browser cannot be
/// started, login fails, the output cannot be written, or the session was
/// lost during collection.
pub(crate) async fn run_collect(config: &AppConfig, args: &CollectArgs) -> anyhow::Result<()> {
    let run_dir = config.output_dir.join(run_dir_name(local_now()));
    let mut session = signed_in_session(config, args.headless).await?;

    let collection = Collector::new(&mut session, collect_options(config, args))
        .collect()
        .await;
    session.quit().await;

    let json_path = write_orders(&run_dir, &collection.json_filename, &collection.orders)?;
    tracing::info!(path = %json_path.display(), "orders dumped to JSON");

    if args.no_timeline {
        tracing::info!("timeline skipped");
    } else {
        let html = timeline::write_timeline(&run_dir, &to_json(&collection.orders)?)?;
        timeline::present_timeline(&html, args.no_open, webbrowser::open)?;
    }
    tracing::info!(count = collection.orders.len(), "successfully processed orders");

    match collection.stop {
        StopReason::SessionLost(e) => {
            Err(anyhow::Error::new(e).context("collection stopped: browser session lost"))
        }
        StopReason::Exhausted | StopReason::NoRows(_) | StopReason::PageError(_) => Ok(()),
    }
}

/// Logs in and saves the first order-list page to `dumps/orders_page_<ts>.html`.
///
/// # Errors
///
/// Returns an error if login fails, the page cannot be read or the file
/// cannot be written.
pub(crate) async fn run_dump_page(config: &AppConfig) -> anyhow::Result<PathBuf> {
    let mut session = signed_in_session(config, None).await?;
    let source = session.source().await;
    session.quit().await;

    let html = source.context("reading order list page source")?;
    let path = dump_page_path(config, local_now());
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    std::fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;

    tracing::info!(path = %path.display(), "page source dumped");
    Ok(path)
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
