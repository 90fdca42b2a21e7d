//! HTTP client for a place's visitor review page.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;

/// Builds the visitor review listing URL for `place_id`, newest first.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidPlaceId`] if `place_id` is empty or is not
/// a single URL path segment, and [`ScraperError::InvalidUrl`] if the result
/// does not parse as a URL.
pub fn review_url(base_url: &str, place_id: &str) -> Result<String, ScraperError> {
    validate_place_id(place_id)?;
    let raw = format!(
        "{}/restaurant/{place_id}/review/visitor?reviewSort=recent",
        base_url.trim_end_matches('/')
    );
    reqwest::Url::parse(&raw)
        .map(String::from)
        .map_err(|e| ScraperError::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })
}

fn validate_place_id(place_id: &str) -> Result<(), ScraperError> {
    let reason = if place_id.is_empty() {
        Some("must not be empty")
    } else if place_id == "." || place_id == ".." {
        Some("must not be a relative path segment")
    } else if place_id
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\' | '?' | '#' | '%'))
    {
        Some("must be a single URL path segment")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ScraperError::InvalidPlaceId {
            place_id: place_id.to_owned(),
            reason: reason.to_owned(),
        }),
        None => Ok(()),
    }
}

/// Fetches review pages over plain HTTP with browser-like headers.
///
/// A single request per call: transport failures and non-2xx responses are
/// returned as errors without retrying.
#[derive(Debug, Clone)]
pub struct ReviewPageClient {
    client: Client,
    base_url: String,
}

impl ReviewPageClient {
    /// Creates a client with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Review listing URL for `place_id` on this client's host.
    ///
    /// # Errors
    ///
    /// See [`review_url`].
    pub fn review_url(&self, place_id: &str) -> Result<String, ScraperError> {
        review_url(&self.base_url, place_id)
    }

    /// Fetches the raw HTML of the review listing at `url`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`]: network, TLS, or timeout failure.
    /// - [`ScraperError::UnexpectedStatus`]: any non-2xx status.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        tracing::debug!(url, "fetching review page");
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header(
                reqwest::header::ACCEPT_LANGUAGE,
                "ko-KR,ko;q=0.8,en-US;q=0.5,en;q=0.3",
            )
            .header(reqwest::header::DNT, "1")
            .header(reqwest::header::UPGRADE_INSECURE_REQUESTS, "1")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        tracing::debug!(url, bytes = body.len(), "review page fetched");
        Ok(body)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
