use std::time::Duration;

use async_trait::async_trait;
use revcount_core::{AppConfig, StrategyKind};

use super::{DateStrategy, PageSource};
use crate::browser::{BrowserLauncher, BrowserSession, ChromiumLauncher, LaunchOptions};
use crate::error::ScraperError;

/// Review list container; present once client-side rendering attached reviews.
pub const PRIMARY_READY_SELECTOR: &str = "#_review_list";

/// Older and alternate layouts of the review list, tried in order when the
/// primary container never appears.
pub const ALT_READY_SELECTORS: &[&str] = &[
    ".place_review_list",
    "[data-nclicks=\"rev.lst\"]",
    ".review_list_wrap",
];

/// Date element candidates against the live DOM, most specific first.
pub const RENDERED_DATE_SELECTORS: &[&str] = &[
    "#_review_list > li > div > div > div > span:nth-child(1) > time",
    "#_review_list time",
    ".review_list time",
    "[data-nclicks=\"rev.lst\"] time",
];

/// Timing for one rendered extraction.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub launch: LaunchOptions,
    pub navigation_timeout: Duration,
    /// Fixed wait after DOM content loaded, for client-side rendering.
    pub settle_delay: Duration,
    pub ready_timeout: Duration,
    /// Per-selector wait for each of [`ALT_READY_SELECTORS`].
    pub alt_ready_timeout: Duration,
    /// Wait after the single scroll so lazy-loaded reviews can attach.
    pub scroll_delay: Duration,
}

impl RenderOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            launch: LaunchOptions {
                user_agent: config.user_agent.clone(),
                viewport_width: config.browser_viewport_width,
                viewport_height: config.browser_viewport_height,
                launch_timeout: Duration::from_secs(config.browser_launch_timeout_secs),
                chrome_executable: config.chrome_executable.clone(),
            },
            navigation_timeout: Duration::from_secs(config.browser_nav_timeout_secs),
            settle_delay: Duration::from_millis(config.browser_settle_delay_ms),
            ready_timeout: Duration::from_secs(config.browser_ready_timeout_secs),
            alt_ready_timeout: Duration::from_secs(config.browser_alt_ready_timeout_secs),
            scroll_delay: Duration::from_millis(config.browser_scroll_delay_ms),
        }
    }
}

/// Last-resort strategy: renders the page in a headless browser and reads
/// dates from the live DOM.
///
/// Every call launches its own browser and closes it before returning,
/// whether the run succeeded or not.
pub struct RenderedPageScraper<L = ChromiumLauncher> {
    launcher: L,
    options: RenderOptions,
}

impl RenderedPageScraper<ChromiumLauncher> {
    #[must_use]
    pub fn chromium(options: RenderOptions) -> Self {
        Self::new(ChromiumLauncher, options)
    }
}

impl<L: BrowserLauncher> RenderedPageScraper<L> {
    #[must_use]
    pub fn new(launcher: L, options: RenderOptions) -> Self {
        Self { launcher, options }
    }

    /// Renders `url` and returns the trimmed text of the matched date nodes.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::BrowserLaunch`]: the browser could not start.
    /// - [`ScraperError::NavigationTimeout`] / [`ScraperError::Browser`]: navigation failed.
    /// - [`ScraperError::ContentNotFound`]: no readiness selector appeared.
    /// - [`ScraperError::Script`]: a page script failed.
    pub async fn render(&self, url: &str) -> Result<Vec<String>, ScraperError> {
        let session = self.launcher.launch(&self.options.launch).await?;
        let mut guard = SessionGuard {
            session: Some(session),
        };
        let outcome = self.drive(guard.live()?, url).await;
        if let Err(e) = guard.close().await {
            tracing::warn!(url, error = %e, "browser did not shut down cleanly");
        }
        outcome
    }

    async fn drive(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
    ) -> Result<Vec<String>, ScraperError> {
        tracing::info!(url, "loading review page in browser");
        session
            .navigate(url, self.options.navigation_timeout)
            .await?;
        tokio::time::sleep(self.options.settle_delay).await;

        self.wait_until_ready(session).await?;

        session.scroll_to_bottom().await?;
        tokio::time::sleep(self.options.scroll_delay).await;

        for selector in RENDERED_DATE_SELECTORS {
            let texts = session.query_texts(selector).await?;
            if texts.is_empty() {
                continue;
            }
            tracing::debug!(selector, count = texts.len(), "date nodes matched");
            return Ok(texts.into_iter().filter(|t| !t.is_empty()).collect());
        }

        tracing::debug!(url, "no date selector matched in rendered page");
        Ok(Vec::new())
    }

    async fn wait_until_ready(&self, session: &mut dyn BrowserSession) -> Result<(), ScraperError> {
        if session
            .wait_for_selector(PRIMARY_READY_SELECTOR, self.options.ready_timeout)
            .await?
        {
            return Ok(());
        }
        tracing::info!("review list not found; trying alternative selectors");

        for selector in ALT_READY_SELECTORS {
            if session
                .wait_for_selector(selector, self.options.alt_ready_timeout)
                .await?
            {
                tracing::info!(selector, "alternative review list selector matched");
                return Ok(());
            }
            tracing::debug!(selector, "alternative selector not found");
        }

        Err(ScraperError::ContentNotFound {
            selectors: std::iter::once(PRIMARY_READY_SELECTOR)
                .chain(ALT_READY_SELECTORS.iter().copied())
                .map(str::to_owned)
                .collect(),
        })
    }
}

/// Holds the session for one render. If the render future is dropped before
/// [`SessionGuard::close`] (overall timeout, client disconnect), the session
/// is abandoned on drop.
struct SessionGuard {
    session: Option<Box<dyn BrowserSession>>,
}

impl SessionGuard {
    fn live(&mut self) -> Result<&mut dyn BrowserSession, ScraperError> {
        match self.session.as_deref_mut() {
            Some(session) => Ok(session),
            None => Err(ScraperError::Browser("session already closed".to_owned())),
        }
    }

    async fn close(mut self) -> Result<(), ScraperError> {
        match self.session.take() {
            Some(session) => session.close().await,
            None => Ok(()),
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::warn!("render cancelled before the browser was closed; releasing it");
            session.abandon();
        }
    }
}

#[async_trait]
impl<L: BrowserLauncher> DateStrategy for RenderedPageScraper<L> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RenderedPage
    }

    async fn collect(&self, page: &PageSource<'_>) -> Result<Vec<String>, ScraperError> {
        self.render(page.url).await
    }
}

#[cfg(test)]
#[path = "rendered_test.rs"]
mod tests;
