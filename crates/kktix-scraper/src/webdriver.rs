//! [`Session`] over a WebDriver server (chromedriver) via `fantoccini`.

use std::time::Duration;

use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::wd::WindowHandle;
use fantoccini::{Client, ClientBuilder, Locator};
use kktix_core::Credentials;
use serde_json::{json, Map};

use crate::dom::ORDER_ROW_CSS;
use crate::error::{ScraperError, SessionError};
use crate::session::Session;

const LOGIN_EMAIL_CSS: &str = "#user_login";
const LOGIN_PASSWORD_CSS: &str = "#user_password";
const LOGIN_SUBMIT_CSS: &str = "[name='commit']";
const FORM_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub webdriver_url: String,
    pub headless: bool,
}

/// Chrome command-line arguments for a run.
#[must_use]
pub fn chrome_args(headless: bool) -> Vec<&'static str> {
    let mut args = Vec::new();
    if headless {
        args.extend(["--headless=new", "--window-size=1920,1080"]);
    }
    args.extend(["--disable-gpu", "--no-sandbox", "--disable-dev-shm-usage"]);
    args
}

/// Name of the browser display mode, for logs.
fn display_mode(headless: bool) -> &'static str {
    if headless {
        "headless"
    } else {
        "visible"
    }
}

fn map_cmd_error(css: &str, err: CmdError) -> SessionError {
    match err {
        CmdError::WaitTimeout => SessionError::Timeout {
            selector: css.to_string(),
            timeout: Duration::ZERO,
        },
        CmdError::Lost(e) => SessionError::Lost(e.to_string()),
        CmdError::Standard(ref wd) => match wd.error {
            ErrorStatus::NoSuchElement => SessionError::NoSuchElement {
                selector: css.to_string(),
            },
            ErrorStatus::InvalidSessionId | ErrorStatus::NoSuchWindow => {
                SessionError::Lost(err.to_string())
            }
            _ => SessionError::Command(err.to_string()),
        },
        other => SessionError::Command(other.to_string()),
    }
}

fn command_error(err: CmdError) -> SessionError {
    map_cmd_error("", err)
}

/// A live browser with the order list in its primary tab.
pub struct WebDriverSession {
    client: Client,
    primary: WindowHandle,
}

impl WebDriverSession {
    /// Starts a new browser session.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Connect`] if the WebDriver server cannot be
    /// reached or refuses the session.
    pub async fn connect(options: &BrowserOptions) -> Result<Self, ScraperError> {
        let args = chrome_args(options.headless);
        tracing::debug!(?args, "chrome arguments");
        tracing::info!("running in {} mode", display_mode(options.headless));

        let mut caps = Map::new();
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        let connect_err = |reason: String| ScraperError::Connect {
            url: options.webdriver_url.clone(),
            reason,
        };
        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&options.webdriver_url)
            .await
            .map_err(|e| connect_err(e.to_string()))?;
        let primary = client
            .window()
            .await
            .map_err(|e| connect_err(e.to_string()))?;

        tracing::info!(url = %options.webdriver_url, "browser session started");
        Ok(Self { client, primary })
    }

    /// Signs in and lands on the first page of the order list.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Login`] if the form is missing or the order
    /// list never shows rows afterwards.
    pub async fn login(
        &mut self,
        credentials: &Credentials,
        login_url: &str,
        orders_url: &str,
        row_timeout: Duration,
    ) -> Result<(), ScraperError> {
        let login_err = |e: SessionError| {
            tracing::error!(error = %e, "login error");
            ScraperError::Login {
                reason: e.to_string(),
            }
        };

        tracing::info!("navigating to login page");
        self.goto(login_url).await.map_err(login_err)?;
        self.fill(LOGIN_EMAIL_CSS, &credentials.email).await.map_err(login_err)?;
        self.fill(LOGIN_PASSWORD_CSS, &credentials.password)
            .await
            .map_err(login_err)?;
        self.wait_for(LOGIN_SUBMIT_CSS, FORM_TIMEOUT)
            .await
            .map_err(login_err)?;
        self.click(LOGIN_SUBMIT_CSS).await.map_err(login_err)?;

        tracing::info!("login submitted, opening order list");
        self.goto(orders_url).await.map_err(login_err)?;
        self.wait_for(ORDER_ROW_CSS, row_timeout)
            .await
            .map_err(login_err)?;
        tracing::info!("order list loaded");
        Ok(())
    }

    /// Navigates the focused tab.
    ///
    /// # Errors
    ///
    /// Any browser failure.
    pub async fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        self.client.goto(url).await.map_err(command_error)
    }

    /// Ends the browser session. A failure to close is logged only.
    pub async fn quit(self) {
        match self.client.close().await {
            Ok(()) => tracing::info!("browser session closed"),
            Err(e) => tracing::error!(error = %e, "error closing browser"),
        }
    }

    async fn fill(&mut self, css: &str, text: &str) -> Result<(), SessionError> {
        let field = self
            .client
            .wait()
            .at_most(FORM_TIMEOUT)
            .for_element(Locator::Css(css))
            .await
            .map_err(|e| with_timeout(map_cmd_error(css, e), FORM_TIMEOUT))?;
        field
            .send_keys(text)
            .await
            .map_err(|e| map_cmd_error(css, e))
    }

    /// Closes `handle`, which focus never reached, and returns to the
    /// primary window.
    async fn discard_tab(&mut self, handle: WindowHandle) -> Result<(), SessionError> {
        self.client
            .switch_to_window(handle)
            .await
            .map_err(command_error)?;
        self.close_tab().await
    }

    async fn focus_primary(&mut self) -> Result<(), SessionError> {
        self.client
            .switch_to_window(self.primary.clone())
            .await
            .map_err(command_error)
    }
}

/// Error to report when a freshly opened tab failed: the original `err`
/// when the tab was closed cleanly, otherwise the cleanup failure.
fn after_tab_cleanup(err: SessionError, cleanup: Result<(), SessionError>) -> SessionError {
    match cleanup {
        Ok(()) => err,
        Err(cleanup_err) => {
            tracing::warn!(error = %err, "could not close failed tab");
            cleanup_err
        }
    }
}

fn with_timeout(err: SessionError, timeout: Duration) -> SessionError {
    match err {
        SessionError::Timeout { selector, .. } => SessionError::Timeout { selector, timeout },
        other => other,
    }
}

impl Session for WebDriverSession {
    async fn wait_for(&mut self, css: &str, timeout: Duration) -> Result<(), SessionError> {
        self.client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(css))
            .await
            .map(|_| ())
            .map_err(|e| with_timeout(map_cmd_error(css, e), timeout))
    }

    async fn source(&mut self) -> Result<String, SessionError> {
        self.client.source().await.map_err(command_error)
    }

    async fn click(&mut self, css: &str) -> Result<(), SessionError> {
        let element = self
            .client
            .find(Locator::Css(css))
            .await
            .map_err(|e| map_cmd_error(css, e))?;
        element.click().await.map_err(|e| map_cmd_error(css, e))
    }

    async fn open_tab(&mut self, url: &str) -> Result<(), SessionError> {
        let tab = self.client.new_window(true).await.map_err(command_error)?;
        if let Err(e) = self.client.switch_to_window(tab.handle.clone()).await {
            let err = command_error(e);
            let cleanup = self.discard_tab(tab.handle).await;
            return Err(after_tab_cleanup(err, cleanup));
        }

        if let Err(e) = self.client.goto(url).await {
            let err = command_error(e);
            let cleanup = self.close_tab().await;
            return Err(after_tab_cleanup(err, cleanup));
        }
        Ok(())
    }

    async fn close_tab(&mut self) -> Result<(), SessionError> {
        self.client.close_window().await.map_err(command_error)?;
        self.focus_primary().await
    }
}
