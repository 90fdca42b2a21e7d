use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use revcount_core::StrategyKind;

use super::{DateStrategy, PageSource};
use crate::error::ScraperError;

static TIME_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<time\b[^>]*>([^<]+)</time>").expect("valid regex"));

/// Inner text of every `<time>` element in `html`, trimmed, skipping blanks.
///
/// Plain regex scan over the markup: no tree is built, so nested markup
/// inside a `<time>` element is not matched.
#[must_use]
pub fn scan_time_tags(html: &str) -> Vec<String> {
    TIME_TAG_RE
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().trim())
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Fast path over the fetched markup.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupDateScanner;

#[async_trait]
impl DateStrategy for MarkupDateScanner {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MarkupScan
    }

    fn needs_markup(&self) -> bool {
        true
    }

    async fn collect(&self, page: &PageSource<'_>) -> Result<Vec<String>, ScraperError> {
        let Some(html) = page.html else {
            return Ok(Vec::new());
        };
        let dates = scan_time_tags(html);
        if dates.is_empty() {
            tracing::debug!(place_id = page.place_id, "no time tags in raw markup");
        } else {
            tracing::debug!(
                place_id = page.place_id,
                count = dates.len(),
                sample = ?dates.iter().take(10).collect::<Vec<_>>(),
                "time tags found in raw markup"
            );
        }
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_inner_text_of_time_tags() {
        let html = r#"
            <ul id="_review_list">
              <li><span><time aria-hidden="true">8.8.금</time></span></li>
              <li><span><time>  8월 8일 </time></span></li>
              <li><span><TIME datetime="x">9.1</TIME></span></li>
            </ul>"#;
        assert_eq!(scan_time_tags(html), vec!["8.8.금", "8월 8일", "9.1"]);
    }

    #[test]
    fn skips_blank_and_nested_time_tags() {
        let html = "<time> </time><time><span>8.8</span></time><time>9.2</time>";
        assert_eq!(scan_time_tags(html), vec!["9.2"]);
    }

    #[test]
    fn does_not_match_similarly_named_tags() {
        let html = "<timeline>8.8</timeline><times>8.9</times>";
        assert!(scan_time_tags(html).is_empty());
    }

    #[test]
    fn empty_document_yields_nothing() {
        assert!(scan_time_tags("").is_empty());
        assert!(scan_time_tags("<html><body>no reviews</body></html>").is_empty());
    }

    #[tokio::test]
    async fn strategy_without_markup_yields_nothing() {
        let page = PageSource {
            place_id: "1",
            url: "http://localhost/restaurant/1/review/visitor?reviewSort=recent",
            html: None,
        };
        let dates = MarkupDateScanner.collect(&page).await.unwrap();
        assert!(dates.is_empty());
    }

    #[tokio::test]
    async fn strategy_reads_page_markup() {
        let page = PageSource {
            place_id: "1",
            url: "http://localhost/restaurant/1/review/visitor?reviewSort=recent",
            html: Some("<time>8.8.금</time>"),
        };
        let dates = MarkupDateScanner.collect(&page).await.unwrap();
        assert_eq!(dates, vec!["8.8.금"]);
        assert!(MarkupDateScanner.needs_markup());
        assert_eq!(MarkupDateScanner.kind(), StrategyKind::MarkupScan);
    }
}
