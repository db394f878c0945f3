use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let email = lookup("KKTIX_EMAIL").ok();
    let password = lookup("KKTIX_PASSWORD").ok();

    let headless = parse_flag(&or_default("KKTIX_HEADLESS", "true"));
    let debug = parse_flag(&or_default("KKTIX_DEBUG", "false"));

    let webdriver_url = or_default("KKTIX_WEBDRIVER_URL", "http://localhost:9515");
    let base_url = or_default("KKTIX_BASE_URL", "https://kktix.com")
        .trim_end_matches('/')
        .to_string();
    let output_dir = PathBuf::from(or_default("KKTIX_OUTPUT_DIR", "."));
    let log_dir = PathBuf::from(or_default("KKTIX_LOG_DIR", "logs"));

    let page_timeout_secs = parse_u64("KKTIX_PAGE_TIMEOUT_SECS", "20")?;
    let detail_timeout_secs = parse_u64("KKTIX_DETAIL_TIMEOUT_SECS", "10")?;
    let settle_delay_ms = parse_u64("KKTIX_SETTLE_DELAY_MS", "2000")?;

    Ok(AppConfig {
        email,
        password,
        headless,
        debug,
        webdriver_url,
        base_url,
        output_dir,
        log_dir,
        page_timeout_secs,
        detail_timeout_secs,
        settle_delay_ms,
    })
}

/// Only a case-insensitive `true` turns a flag on; anything else is off.
fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
