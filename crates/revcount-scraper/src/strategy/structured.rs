use std::sync::LazyLock;

use async_trait::async_trait;
use revcount_core::StrategyKind;
use scraper::{ElementRef, Html, Selector};

use super::{DateStrategy, PageSource};
use crate::error::ScraperError;

/// Known position of the date inside each review card of the listing.
const REVIEW_DATE_SELECTOR: &str = "#_review_list > li > div > div > div > span:nth-child(1) > time";

static REVIEW_DATE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(REVIEW_DATE_SELECTOR).expect("valid review date selector"));
static ANY_TIME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("time").expect("valid time selector"));

/// Parses `html` and collects date tokens from `<time>` elements.
///
/// Tries the review card path first; when that matches nothing, falls back
/// to every `<time>` element in the document. Each element contributes its
/// `datetime` attribute when non-blank, else its trimmed text.
#[must_use]
pub fn query_time_elements(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let primary = collect_dates(document.select(&REVIEW_DATE));
    if !primary.is_empty() {
        return primary;
    }

    tracing::debug!("review card selector matched nothing; querying every time element");
    collect_dates(document.select(&ANY_TIME))
}

fn collect_dates<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> Vec<String> {
    elements.filter_map(element_date).collect()
}

fn element_date(element: ElementRef<'_>) -> Option<String> {
    if let Some(attr) = element
        .value()
        .attr("datetime")
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return Some(attr.to_owned());
    }
    let text = element.text().collect::<String>();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}

/// Fallback over the fetched markup using a parsed document tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredDateQuery;

#[async_trait]
impl DateStrategy for StructuredDateQuery {
    fn kind(&self) -> StrategyKind {
        StrategyKind::StructuredQuery
    }

    fn needs_markup(&self) -> bool {
        true
    }

    async fn collect(&self, page: &PageSource<'_>) -> Result<Vec<String>, ScraperError> {
        let Some(html) = page.html else {
            return Ok(Vec::new());
        };
        let dates = query_time_elements(html);
        tracing::debug!(
            place_id = page.place_id,
            count = dates.len(),
            "time elements found via selector query"
        );
        Ok(dates)
    }
}
