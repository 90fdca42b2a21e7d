//! Runs the configured strategy chain for one place and turns the outcome
//! into a result value.
//!
//! Public operations never return `Err` or panic: every [`ScraperError`] is
//! logged and folded into the failure variant, carrying the place id.

use std::time::Duration;

use revcount_core::{
    AppConfig, CanonicalDate, DateListResult, DateListSuccess, ExtractionFailure,
    ExtractionResult, ExtractionSuccess, StrategyKind, StrategyMode,
};

use crate::aggregate::aggregate_dates;
use crate::client::ReviewPageClient;
use crate::error::ScraperError;
use crate::strategy::{
    DateStrategy, MarkupDateScanner, PageSource, RenderOptions, RenderedPageScraper,
    StructuredDateQuery,
};

/// Raw tokens from the first strategy that found any.
#[derive(Debug)]
struct Collected {
    url: String,
    strategy: StrategyKind,
    tokens: Vec<String>,
}

pub struct ExtractionOrchestrator {
    client: ReviewPageClient,
    strategies: Vec<Box<dyn DateStrategy>>,
    timeout: Duration,
}

impl std::fmt::Debug for ExtractionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionOrchestrator")
            .field("base_url", &self.client.base_url())
            .field("strategies", &self.strategy_kinds())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ExtractionOrchestrator {
    /// Builds an orchestrator over an explicit, ordered strategy chain.
    ///
    /// `timeout` bounds one whole extraction, including the page fetch and
    /// any browser session.
    #[must_use]
    pub fn new(
        client: ReviewPageClient,
        strategies: Vec<Box<dyn DateStrategy>>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            strategies,
            timeout,
        }
    }

    /// Builds the chain selected by `config.strategy`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::with_mode(config, config.strategy)
    }

    /// Like [`ExtractionOrchestrator::from_config`] with the strategy mode
    /// overridden.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn with_mode(config: &AppConfig, mode: StrategyMode) -> Result<Self, ScraperError> {
        let client = ReviewPageClient::new(
            &config.review_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        let strategies: Vec<Box<dyn DateStrategy>> = match mode {
            StrategyMode::Markup => vec![Box::new(MarkupDateScanner), Box::new(StructuredDateQuery)],
            StrategyMode::Rendered => vec![Box::new(RenderedPageScraper::chromium(
                RenderOptions::from_config(config),
            ))],
        };
        Ok(Self::new(
            client,
            strategies,
            Duration::from_secs(config.extraction_timeout_secs),
        ))
    }

    /// Strategies in the order they are tried.
    #[must_use]
    pub fn strategy_kinds(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Per-day review counts for `place_id`.
    pub async fn fetch_and_aggregate(&self, place_id: &str) -> ExtractionResult {
        match self.collect(place_id).await {
            Ok(collected) => {
                let counts = aggregate_dates(&collected.tokens);
                tracing::info!(
                    place_id,
                    method = %collected.strategy,
                    tokens = collected.tokens.len(),
                    total_reviews = counts.total(),
                    days = counts.len(),
                    "review dates aggregated"
                );
                ExtractionResult::Success(ExtractionSuccess::new(
                    place_id,
                    counts,
                    collected.strategy,
                    collected.url,
                ))
            }
            Err(e) => ExtractionResult::Failure(failure(place_id, &e)),
        }
    }

    /// Number of reviews for `place_id` on `date`; `0` when the date does
    /// not appear on the page.
    ///
    /// # Errors
    ///
    /// Returns the [`ExtractionFailure`] when the page could not be read at
    /// all. A missing date is never an error.
    pub async fn fetch_and_count(
        &self,
        place_id: &str,
        date: CanonicalDate,
    ) -> Result<usize, ExtractionFailure> {
        let success = self.fetch_and_aggregate(place_id).await.into_result()?;
        let count = success.count_for(date);
        tracing::debug!(place_id, date = %date, count, "date count looked up");
        Ok(count)
    }

    /// The raw date tokens for `place_id`, exactly as extracted.
    pub async fn fetch_dates(&self, place_id: &str) -> DateListResult {
        match self.collect(place_id).await {
            Ok(collected) => {
                tracing::info!(
                    place_id,
                    method = %collected.strategy,
                    count = collected.tokens.len(),
                    "review dates listed"
                );
                DateListResult::Success(DateListSuccess::new(
                    place_id,
                    collected.tokens,
                    collected.strategy,
                    collected.url,
                ))
            }
            Err(e) => DateListResult::Failure(failure(place_id, &e)),
        }
    }

    async fn collect(&self, place_id: &str) -> Result<Collected, ScraperError> {
        let url = self.client.review_url(place_id)?;
        let (strategy, tokens) = tokio::time::timeout(self.timeout, self.run_chain(place_id, &url))
            .await
            .map_err(|_| ScraperError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            })??;
        Ok(Collected {
            url,
            strategy,
            tokens,
        })
    }

    async fn run_chain(
        &self,
        place_id: &str,
        url: &str,
    ) -> Result<(StrategyKind, Vec<String>), ScraperError> {
        let html = if self.strategies.iter().any(|s| s.needs_markup()) {
            Some(self.client.fetch_page(url).await?)
        } else {
            None
        };
        let page = PageSource {
            place_id,
            url,
            html: html.as_deref(),
        };

        for strategy in &self.strategies {
            let kind = strategy.kind();
            let tokens = strategy.collect(&page).await?;
            if tokens.is_empty() {
                tracing::debug!(place_id, strategy = %kind, "strategy found no dates");
                continue;
            }
            tracing::debug!(place_id, strategy = %kind, count = tokens.len(), "strategy found dates");
            return Ok((kind, tokens));
        }

        Err(ScraperError::NoDates {
            strategies: self.strategies.iter().map(|s| s.kind().to_string()).collect(),
        })
    }
}

fn failure(place_id: &str, error: &ScraperError) -> ExtractionFailure {
    tracing::warn!(place_id, error = %error, "review extraction failed");
    ExtractionFailure::new(place_id, error.to_string())
}
