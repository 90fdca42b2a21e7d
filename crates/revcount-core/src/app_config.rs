use std::net::SocketAddr;
use std::path::PathBuf;

/// Which extraction chain a deployment runs.
///
/// `Markup` fetches the review page over plain HTTP and tries the markup
/// scan first, then the structured DOM query. `Rendered` drives a headless
/// browser unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyMode {
    Markup,
    Rendered,
}

impl std::fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyMode::Markup => write!(f, "markup"),
            StrategyMode::Rendered => write!(f, "rendered"),
        }
    }
}

impl std::str::FromStr for StrategyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markup" => Ok(StrategyMode::Markup),
            "rendered" => Ok(StrategyMode::Rendered),
            other => Err(format!(
                "unknown strategy \"{other}\"; expected one of: markup, rendered"
            )),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub strategy: StrategyMode,
    pub review_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub extraction_timeout_secs: u64,
    pub browser_launch_timeout_secs: u64,
    pub browser_nav_timeout_secs: u64,
    pub browser_settle_delay_ms: u64,
    pub browser_ready_timeout_secs: u64,
    pub browser_alt_ready_timeout_secs: u64,
    pub browser_scroll_delay_ms: u64,
    pub browser_viewport_width: u32,
    pub browser_viewport_height: u32,
    pub chrome_executable: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("strategy", &self.strategy)
            .field("review_base_url", &self.review_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("extraction_timeout_secs", &self.extraction_timeout_secs)
            .field(
                "browser_launch_timeout_secs",
                &self.browser_launch_timeout_secs,
            )
            .field("browser_nav_timeout_secs", &self.browser_nav_timeout_secs)
            .field("browser_settle_delay_ms", &self.browser_settle_delay_ms)
            .field(
                "browser_ready_timeout_secs",
                &self.browser_ready_timeout_secs,
            )
            .field(
                "browser_alt_ready_timeout_secs",
                &self.browser_alt_ready_timeout_secs,
            )
            .field("browser_scroll_delay_ms", &self.browser_scroll_delay_ms)
            .field(
                "browser_viewport",
                &format_args!(
                    "{}x{}",
                    self.browser_viewport_width, self.browser_viewport_height
                ),
            )
            .field("chrome_executable", &self.chrome_executable)
            .finish()
    }
}
