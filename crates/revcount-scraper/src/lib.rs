pub mod aggregate;
pub mod browser;
pub mod client;
pub mod error;
pub mod normalize;
pub mod orchestrator;
pub mod strategy;

pub use aggregate::aggregate_dates;
pub use browser::{BrowserLauncher, BrowserSession, ChromiumLauncher, LaunchOptions};
pub use client::{review_url, ReviewPageClient};
pub use error::ScraperError;
pub use normalize::normalize_date;
pub use orchestrator::ExtractionOrchestrator;
pub use strategy::{
    DateStrategy, MarkupDateScanner, PageSource, RenderOptions, RenderedPageScraper,
    StructuredDateQuery,
};
