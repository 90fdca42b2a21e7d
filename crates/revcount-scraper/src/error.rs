use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid place id \"{place_id}\": {reason}")]
    InvalidPlaceId { place_id: String, reason: String },

    #[error("invalid review URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("navigation to {url} timed out after {timeout_secs}s")]
    NavigationTimeout { url: String, timeout_secs: u64 },

    #[error("Review list not found with any selector (tried: {})", .selectors.join(", "))]
    ContentNotFound { selectors: Vec<String> },

    #[error("page script failed: {0}")]
    Script(String),

    #[error("extraction exceeded {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("no review dates found (tried: {})", .strategies.join(", "))]
    NoDates { strategies: Vec<String> },
}
