//! Static timeline page written next to the orders JSON.
//!
//! The three template files are compiled into the binary. Only
//! `timeline.html` is rewritten: its placeholder comment becomes
//!
//! ```text
//! const timelineData = [ ...orders... ];
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

const TIMELINE_HTML: &str = include_str!("../templates/timeline.html");
const STYLES_CSS: &str = include_str!("../templates/styles.css");
const TIMELINE_JS: &str = include_str!("../templates/timeline.js");

pub(crate) const DATA_PLACEHOLDER: &str = "// [TIMELINE_DATA_INJECTION]";

/// Substitutes the placeholder in `template` with the orders array.
///
/// `</` in the data is written as `<\/`, which is the same JSON string but
/// cannot close the surrounding `<script>` element.
pub(crate) fn render_timeline_html(template: &str, orders_json: &str) -> String {
    let data = orders_json.replace("</", "<\\/");
    template.replace(DATA_PLACEHOLDER, &format!("const timelineData = {data};"))
}

/// Writes `timeline.html`, `styles.css` and `timeline.js` into `dir` and
/// returns the path of `timeline.html`.
pub(crate) fn write_timeline(dir: &Path, orders_json: &str) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    for (name, contents) in [("styles.css", STYLES_CSS), ("timeline.js", TIMELINE_JS)] {
        let path = dir.join(name);
        fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
    }

    let html_path = dir.join("timeline.html");
    fs::write(&html_path, render_timeline_html(TIMELINE_HTML, orders_json))
        .with_context(|| format!("writing {}", html_path.display()))?;
    Ok(html_path)
}

/// Rebuilds the timeline for an existing orders file, in the same directory.
pub(crate) fn rebuild_timeline(json_path: &Path) -> anyhow::Result<PathBuf> {
    let orders = kktix_scraper::read_orders(json_path)?;
    tracing::info!(path = %json_path.display(), count = orders.len(), "loaded orders");

    let dir = json_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    write_timeline(dir, &kktix_scraper::to_json(&orders)?)
}

/// Logs the `file://` URL of the written page and, unless `no_open`, hands
/// it to `open`. Returns whether the page was opened.
///
/// A failure to open is logged at warn level and does not fail the run.
///
/// # Errors
///
/// Returns an error if `html` cannot be resolved to an absolute path.
pub(crate) fn present_timeline(
    html: &Path,
    no_open: bool,
    open: impl FnOnce(&str) -> std::io::Result<()>,
) -> anyhow::Result<bool> {
    let url = file_url(html)?;
    tracing::info!(url = %url, "timeline visualization written");
    if no_open {
        return Ok(false);
    }

    match open(&url) {
        Ok(()) => {
            tracing::info!("timeline opened in browser");
            Ok(true)
        }
        Err(e) => {
            tracing::warn!(error = %e, url = %url, "could not open timeline in browser");
            Ok(false)
        }
    }
}

/// `file://` URL of `path` for opening in a browser.
pub(crate) fn file_url(path: &Path) -> anyhow::Result<String> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("resolving {}", path.display()))?;
    Ok(format!("file://{}", absolute.display()))
}

#[cfg(test)]
#[path = "timeline_test.rs"]
mod tests;
