use crate::app_config::{AppConfig, StrategyMode};
use crate::ConfigError;

/// Desktop Chrome identity sent with plain HTTP requests and set on the
/// headless browser. The review site serves a stripped page to unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

pub const DEFAULT_REVIEW_BASE_URL: &str = "https://m.place.naver.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a working
/// development config. Tests drive this with a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    // A zero timeout makes every request fail immediately.
    let parse_timeout_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        match parse_u64(var, default)? {
            0 => Err(invalid(var, "must be greater than zero".to_string())),
            secs => Ok(secs),
        }
    };

    let bind_addr = or_default("REVCOUNT_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("REVCOUNT_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("REVCOUNT_LOG_LEVEL", "info");
    let strategy = or_default("REVCOUNT_STRATEGY", "markup")
        .parse::<StrategyMode>()
        .map_err(|reason| invalid("REVCOUNT_STRATEGY", reason))?;

    let review_base_url = or_default("REVCOUNT_REVIEW_BASE_URL", DEFAULT_REVIEW_BASE_URL)
        .trim_end_matches('/')
        .to_string();
    if !(review_base_url.starts_with("http://") || review_base_url.starts_with("https://")) {
        return Err(invalid(
            "REVCOUNT_REVIEW_BASE_URL",
            format!("\"{review_base_url}\" must start with http:// or https://"),
        ));
    }

    let request_timeout_secs = parse_timeout_secs("REVCOUNT_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("REVCOUNT_USER_AGENT", DEFAULT_USER_AGENT);
    let extraction_timeout_secs = parse_timeout_secs("REVCOUNT_EXTRACTION_TIMEOUT_SECS", "120")?;

    let browser_launch_timeout_secs =
        parse_timeout_secs("REVCOUNT_BROWSER_LAUNCH_TIMEOUT_SECS", "60")?;
    let browser_nav_timeout_secs = parse_timeout_secs("REVCOUNT_BROWSER_NAV_TIMEOUT_SECS", "45")?;
    let browser_settle_delay_ms = parse_u64("REVCOUNT_BROWSER_SETTLE_DELAY_MS", "5000")?;
    let browser_ready_timeout_secs = parse_u64("REVCOUNT_BROWSER_READY_TIMEOUT_SECS", "15")?;
    let browser_alt_ready_timeout_secs =
        parse_u64("REVCOUNT_BROWSER_ALT_READY_TIMEOUT_SECS", "5")?;
    let browser_scroll_delay_ms = parse_u64("REVCOUNT_BROWSER_SCROLL_DELAY_MS", "3000")?;
    let browser_viewport_width = parse_u32("REVCOUNT_BROWSER_VIEWPORT_WIDTH", "1280")?;
    let browser_viewport_height = parse_u32("REVCOUNT_BROWSER_VIEWPORT_HEIGHT", "800")?;
    let chrome_executable = lookup("REVCOUNT_CHROME_EXECUTABLE")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        bind_addr,
        log_level,
        strategy,
        review_base_url,
        request_timeout_secs,
        user_agent,
        extraction_timeout_secs,
        browser_launch_timeout_secs,
        browser_nav_timeout_secs,
        browser_settle_delay_ms,
        browser_ready_timeout_secs,
        browser_alt_ready_timeout_secs,
        browser_scroll_delay_ms,
        browser_viewport_width,
        browser_viewport_height,
        chrome_executable,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
