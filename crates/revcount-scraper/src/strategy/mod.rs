//! Extraction strategies: independent ways of pulling raw date tokens out of
//! a review page.
//!
//! The orchestrator runs an ordered list of strategies and stops at the
//! first one that yields a non-empty token list. An empty list means "not
//! found here, try the next one"; an `Err` ends the chain.

mod markup;
mod rendered;
mod structured;

use async_trait::async_trait;
use revcount_core::StrategyKind;

use crate::error::ScraperError;

pub use markup::{scan_time_tags, MarkupDateScanner};
pub use rendered::{RenderOptions, RenderedPageScraper, ALT_READY_SELECTORS, PRIMARY_READY_SELECTOR, RENDERED_DATE_SELECTORS};
pub use structured::{query_time_elements, StructuredDateQuery};

/// What a strategy gets to look at for one place.
#[derive(Debug, Clone, Copy)]
pub struct PageSource<'a> {
    pub place_id: &'a str,
    pub url: &'a str,
    /// Raw HTML of `url`, present when any strategy in the chain asked for it.
    pub html: Option<&'a str>,
}

#[async_trait]
pub trait DateStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Whether this strategy reads [`PageSource::html`]. The orchestrator
    /// fetches the page over HTTP once if any strategy needs it.
    fn needs_markup(&self) -> bool {
        false
    }

    /// Raw date tokens found on the page, trimmed, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] for failures that should end the chain
    /// (transport, browser, readiness). "Nothing found" is `Ok(vec![])`.
    async fn collect(&self, page: &PageSource<'_>) -> Result<Vec<String>, ScraperError>;
}
