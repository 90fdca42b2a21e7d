use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

use super::{BrowserLauncher, BrowserSession, LaunchOptions};
use crate::error::ScraperError;

/// Chrome flags needed to run inside containers without a user namespace
/// or a GPU.
const LAUNCH_ARGS: &[&str] = &[
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--no-first-run",
    "--no-zygote",
    "--disable-gpu",
    "--disable-features=VizDisplayCompositor",
];

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Launches headless Chrome/Chromium through the DevTools protocol.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChromiumLauncher;

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(
        &self,
        options: &LaunchOptions,
    ) -> Result<Box<dyn BrowserSession>, ScraperError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(options.viewport_width, options.viewport_height)
            .viewport(Viewport {
                width: options.viewport_width,
                height: options.viewport_height,
                ..Viewport::default()
            })
            .launch_timeout(options.launch_timeout)
            .args(LAUNCH_ARGS.iter().copied());
        if let Some(path) = &options.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(ScraperError::BrowserLaunch)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScraperError::BrowserLaunch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "browser event handler stopped");
                    break;
                }
            }
        });

        let page = match open_page(&browser, &options.user_agent).await {
            Ok(page) => page,
            Err(e) => {
                if let Err(close_err) = shutdown(&mut browser).await {
                    tracing::warn!(error = %close_err, "browser shutdown after failed launch");
                }
                handler_task.abort();
                return Err(ScraperError::BrowserLaunch(e.to_string()));
            }
        };

        tracing::debug!("browser launched");
        Ok(Box::new(ChromiumSession {
            browser: Some(browser),
            page,
            handler_task,
        }))
    }
}

async fn open_page(
    browser: &Browser,
    user_agent: &str,
) -> Result<Page, chromiumoxide::error::CdpError> {
    let page = browser.new_page("about:blank").await?;
    page.set_user_agent(SetUserAgentOverrideParams::new(user_agent))
        .await?;
    Ok(page)
}

/// Closes the browser gracefully, falling back to killing the process, and
/// waits for it to exit.
async fn shutdown(browser: &mut Browser) -> Result<(), ScraperError> {
    let closed = browser
        .close()
        .await
        .map(|_| ())
        .map_err(|e| ScraperError::Browser(format!("close: {e}")));
    if closed.is_err() {
        if let Some(Err(e)) = browser.kill().await {
            tracing::warn!(error = %e, "failed to kill browser process");
        }
    }
    browser
        .wait()
        .await
        .map_err(|e| ScraperError::Browser(format!("wait for exit: {e}")))?;
    closed
}

fn js_string(value: &str) -> Result<String, ScraperError> {
    serde_json::to_string(value).map_err(|e| ScraperError::Script(e.to_string()))
}

struct ChromiumSession {
    browser: Option<Browser>,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl ChromiumSession {
    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T, ScraperError> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| ScraperError::Script(e.to_string()))?
            .into_value::<T>()
            .map_err(|e| ScraperError::Script(e.to_string()))
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), ScraperError> {
        let navigation = async {
            let response = self
                .page
                .execute(NavigateParams::new(url))
                .await
                .map_err(|e| ScraperError::Browser(format!("navigate to {url}: {e}")))?;
            if let Some(error_text) = &response.result.error_text {
                return Err(ScraperError::Browser(format!(
                    "navigate to {url}: {error_text}"
                )));
            }

            // DOMContentLoaded has fired once readyState leaves "loading".
            let loaded = "document.location.href !== 'about:blank' \
                          && document.readyState !== 'loading'";
            loop {
                if matches!(self.eval::<bool>(loaded.to_owned()).await, Ok(true)) {
                    return Ok(());
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        };

        tokio::time::timeout(timeout, navigation)
            .await
            .map_err(|_| ScraperError::NavigationTimeout {
                url: url.to_owned(),
                timeout_secs: timeout.as_secs(),
            })?
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool, ScraperError> {
        let script = format!("document.querySelector({}) !== null", js_string(selector)?);
        let poll = async {
            loop {
                match self.eval::<bool>(script.clone()).await {
                    Ok(true) => return,
                    Ok(false) => {}
                    // The execution context is replaced while client-side
                    // rendering swaps documents; keep polling.
                    Err(e) => tracing::trace!(selector, error = %e, "selector poll failed"),
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        };
        Ok(tokio::time::timeout(timeout, poll).await.is_ok())
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), ScraperError> {
        self.page
            .evaluate("window.scrollTo(0, document.body.scrollHeight)")
            .await
            .map(|_| ())
            .map_err(|e| ScraperError::Script(e.to_string()))
    }

    async fn query_texts(&mut self, selector: &str) -> Result<Vec<String>, ScraperError> {
        let script = format!(
            "Array.from(document.querySelectorAll({}), el => (el.textContent || '').trim())",
            js_string(selector)?
        );
        self.eval::<Vec<String>>(script).await
    }

    async fn close(self: Box<Self>) -> Result<(), ScraperError> {
        let mut this = self;
        let result = match this.browser.take() {
            Some(mut browser) => shutdown(&mut browser).await,
            None => Ok(()),
        };
        this.handler_task.abort();
        tracing::debug!("browser closed");
        result
    }

    fn abandon(mut self: Box<Self>) {
        self.release_in_background();
    }
}

impl ChromiumSession {
    /// No-op once the browser has been taken by `close` or an earlier release,
    /// so the handler keeps driving a shutdown already in flight.
    fn release_in_background(&mut self) {
        let Some(mut browser) = self.browser.take() else {
            return;
        };
        let handler = self.handler_task.abort_handle();
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                tracing::debug!("shutting browser down in background");
                runtime.spawn(async move {
                    if let Err(e) = shutdown(&mut browser).await {
                        tracing::warn!(error = %e, "background browser shutdown failed");
                    }
                    handler.abort();
                });
            }
            // Without a runtime the browser's own drop kills the process.
            Err(_) => handler.abort(),
        }
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.release_in_background();
    }
}
