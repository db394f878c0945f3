use std::path::PathBuf;

use crate::ConfigError;

/// Login e-mail and password for the ticketing account.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub email: Option<String>,
    pub password: Option<String>,
    pub headless: bool,
    pub debug: bool,
    pub webdriver_url: String,
    pub base_url: String,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
    pub page_timeout_secs: u64,
    pub detail_timeout_secs: u64,
    pub settle_delay_ms: u64,
}

impl AppConfig {
    /// Sign-in form page.
    #[must_use]
    pub fn login_url(&self) -> String {
        format!("{}/users/sign_in", self.base_url)
    }

    /// Paginated order-history list.
    #[must_use]
    pub fn orders_url(&self) -> String {
        format!("{}/account/orders", self.base_url)
    }

    /// Returns the login credentials, or the first missing variable.
    ///
    /// Credentials are only needed by commands that sign in, so they are
    /// validated lazily rather than at load time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming `KKTIX_EMAIL` or
    /// `KKTIX_PASSWORD` when either is unset or empty.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let email = self
            .email
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("KKTIX_EMAIL".to_string()))?;
        let password = self
            .password
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("KKTIX_PASSWORD".to_string()))?;
        Ok(Credentials { email, password })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("headless", &self.headless)
            .field("debug", &self.debug)
            .field("webdriver_url", &self.webdriver_url)
            .field("base_url", &self.base_url)
            .field("output_dir", &self.output_dir)
            .field("log_dir", &self.log_dir)
            .field("page_timeout_secs", &self.page_timeout_secs)
            .field("detail_timeout_secs", &self.detail_timeout_secs)
            .field("settle_delay_ms", &self.settle_delay_ms)
            .finish()
    }
}
