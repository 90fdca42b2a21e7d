//! Headless browser seam.
//!
//! The rendering strategy only talks to these traits, so the page protocol
//! (navigate, wait, scroll, query) can be exercised without a real browser.

mod chromium;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScraperError;

pub use chromium::ChromiumLauncher;

/// Settings applied when a browser session starts.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub launch_timeout: Duration,
    /// Explicit Chrome/Chromium binary; auto-detected when `None`.
    pub chrome_executable: Option<PathBuf>,
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Starts an isolated browser with one blank page.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::BrowserLaunch`] if the process cannot be
    /// started or the page cannot be opened. Nothing is left running on error.
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn BrowserSession>, ScraperError>;
}

/// One live browser process with a single page.
///
/// Callers finish with [`BrowserSession::close`], or with
/// [`BrowserSession::abandon`] when the request was cancelled and there is
/// no task left to await the shutdown.
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigates and returns once the DOM content has loaded, without waiting
    /// for subresources.
    ///
    /// # Errors
    ///
    /// [`ScraperError::NavigationTimeout`] past `timeout`, or
    /// [`ScraperError::Browser`] if the navigation itself fails.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), ScraperError>;

    /// Polls until `selector` matches an element. `Ok(false)` on timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] if the page cannot be queried at all.
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool, ScraperError>;

    /// Scrolls the document to the bottom once.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Script`] if the scroll script fails.
    async fn scroll_to_bottom(&mut self) -> Result<(), ScraperError>;

    /// Trimmed text content of every element matching `selector`, in
    /// document order. Blank texts are kept so the caller sees match counts.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Script`] if the query script fails.
    async fn query_texts(&mut self, selector: &str) -> Result<Vec<String>, ScraperError>;

    /// Shuts the browser down and waits for the process to exit.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Browser`] if shutdown reports a failure; the
    /// process is still gone afterwards.
    async fn close(self: Box<Self>) -> Result<(), ScraperError>;

    /// Releases the browser without waiting for it to exit. Must not block;
    /// called from `Drop` on cancellation.
    fn abandon(self: Box<Self>);
}
