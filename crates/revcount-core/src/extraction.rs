//! Outcome records returned by the extraction pipeline.
//!
//! Both result types serialize with a leading `success` flag and camelCase
//! field names (`placeId`, `dateCounts`, `totalReviews`, `extractedAt`), the
//! wire shape HTTP clients of the service depend on.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::dates::{CanonicalDate, DateCounts};

/// Technique that produced the raw date tokens of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StrategyKind {
    /// Direct `<time>` tag scan over the raw markup.
    #[serde(rename = "time_tag_extraction")]
    MarkupScan,
    /// CSS selector query over a parsed document tree.
    #[serde(rename = "cheerio_css_selector")]
    StructuredQuery,
    /// Headless browser rendering.
    #[serde(rename = "headless_browser")]
    RenderedPage,
}

impl StrategyKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::MarkupScan => "time_tag_extraction",
            StrategyKind::StructuredQuery => "cheerio_css_selector",
            StrategyKind::RenderedPage => "headless_browser",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionSuccess {
    place_id: String,
    date_counts: DateCounts,
    total_reviews: usize,
    #[serde(rename = "method")]
    strategy: StrategyKind,
    url: String,
    extracted_at: DateTime<Utc>,
}

impl ExtractionSuccess {
    /// Stamps the record with the current time; `total_reviews` is always
    /// the sum of `date_counts`.
    #[must_use]
    pub fn new(
        place_id: impl Into<String>,
        date_counts: DateCounts,
        strategy: StrategyKind,
        url: impl Into<String>,
    ) -> Self {
        let total_reviews = date_counts.total();
        Self {
            place_id: place_id.into(),
            date_counts,
            total_reviews,
            strategy,
            url: url.into(),
            extracted_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn place_id(&self) -> &str {
        &self.place_id
    }

    #[must_use]
    pub fn date_counts(&self) -> &DateCounts {
        &self.date_counts
    }

    #[must_use]
    pub fn total_reviews(&self) -> usize {
        self.total_reviews
    }

    #[must_use]
    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn extracted_at(&self) -> DateTime<Utc> {
        self.extracted_at
    }

    /// Reviews on `date`, `0` when none were found.
    #[must_use]
    pub fn count_for(&self, date: CanonicalDate) -> usize {
        self.date_counts.get(date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionFailure {
    pub error: String,
    pub place_id: String,
}

impl ExtractionFailure {
    #[must_use]
    pub fn new(place_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            place_id: place_id.into(),
        }
    }
}

/// Per-day review counts for one place, or the reason they could not be
/// collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Success(ExtractionSuccess),
    Failure(ExtractionFailure),
}

impl ExtractionResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success(_))
    }

    #[must_use]
    pub fn place_id(&self) -> &str {
        match self {
            ExtractionResult::Success(s) => &s.place_id,
            ExtractionResult::Failure(f) => &f.place_id,
        }
    }

    /// Converts into a `Result` so callers can use `?` on the failure arm.
    ///
    /// # Errors
    ///
    /// Returns the [`ExtractionFailure`] payload for the failure variant.
    pub fn into_result(self) -> Result<ExtractionSuccess, ExtractionFailure> {
        match self {
            ExtractionResult::Success(s) => Ok(s),
            ExtractionResult::Failure(f) => Err(f),
        }
    }
}

/// The raw date tokens of one place, exactly as found on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateListSuccess {
    place_id: String,
    url: String,
    dates: Vec<String>,
    count: usize,
    #[serde(rename = "method")]
    strategy: StrategyKind,
    extracted_at: DateTime<Utc>,
}

impl DateListSuccess {
    #[must_use]
    pub fn new(
        place_id: impl Into<String>,
        dates: Vec<String>,
        strategy: StrategyKind,
        url: impl Into<String>,
    ) -> Self {
        Self {
            place_id: place_id.into(),
            url: url.into(),
            count: dates.len(),
            dates,
            strategy,
            extracted_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    #[must_use]
    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateListResult {
    Success(DateListSuccess),
    Failure(ExtractionFailure),
}

impl DateListResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, DateListResult::Success(_))
    }
}

#[derive(Serialize)]
struct Flagged<'a, T: Serialize> {
    success: bool,
    #[serde(flatten)]
    body: &'a T,
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExtractionResult::Success(body) => Flagged {
                success: true,
                body,
            }
            .serialize(serializer),
            ExtractionResult::Failure(body) => Flagged {
                success: false,
                body,
            }
            .serialize(serializer),
        }
    }
}

impl Serialize for DateListResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DateListResult::Success(body) => Flagged {
                success: true,
                body,
            }
            .serialize(serializer),
            DateListResult::Failure(body) => Flagged {
                success: false,
                body,
            }
            .serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(month: u32, day: u32) -> CanonicalDate {
        CanonicalDate::new(month, day).expect("valid test date")
    }

    fn sample_success() -> ExtractionSuccess {
        let counts: DateCounts = [date(8, 8), date(8, 8), date(9, 1)].into_iter().collect();
        ExtractionSuccess::new(
            "1688300738",
            counts,
            StrategyKind::MarkupScan,
            "https://m.place.naver.com/restaurant/1688300738/review/visitor?reviewSort=recent",
        )
    }

    #[test]
    fn success_total_matches_sum_of_counts() {
        let success = sample_success();
        assert_eq!(success.total_reviews(), 3);
        assert_eq!(success.total_reviews(), success.date_counts().total());
        assert_eq!(success.count_for(date(8, 8)), 2);
        assert_eq!(success.count_for(date(1, 1)), 0);
    }

    #[test]
    fn success_serializes_wire_fields() {
        let json = serde_json::to_value(ExtractionResult::Success(sample_success())).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["placeId"], "1688300738");
        assert_eq!(json["dateCounts"], serde_json::json!({"8.8": 2, "9.1": 1}));
        assert_eq!(json["totalReviews"], 3);
        assert_eq!(json["method"], "time_tag_extraction");
        assert!(json["url"].as_str().unwrap().contains("/restaurant/1688300738/"));
        assert!(json["extractedAt"].is_string());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn failure_serializes_without_counts() {
        let result = ExtractionResult::Failure(ExtractionFailure::new("42", "HTTP error: boom"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "HTTP error: boom", "placeId": "42"})
        );
        assert!(!result.is_success());
        assert_eq!(result.place_id(), "42");
    }

    #[test]
    fn into_result_splits_variants() {
        let ok = ExtractionResult::Success(sample_success()).into_result();
        assert!(ok.is_ok());
        let err = ExtractionResult::Failure(ExtractionFailure::new("1", "x")).into_result();
        assert_eq!(err.unwrap_err().error, "x");
    }

    #[test]
    fn date_list_serializes_count_and_dates() {
        let list = DateListSuccess::new(
            "7",
            vec!["8.8.금".to_owned(), "8월 9일".to_owned()],
            StrategyKind::RenderedPage,
            "https://example.test/restaurant/7/review/visitor?reviewSort=recent",
        );
        let json = serde_json::to_value(DateListResult::Success(list)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 2);
        assert_eq!(json["dates"], serde_json::json!(["8.8.금", "8월 9일"]));
        assert_eq!(json["method"], "headless_browser");
    }

    #[test]
    fn strategy_kind_display_matches_wire_name() {
        for kind in [
            StrategyKind::MarkupScan,
            StrategyKind::StructuredQuery,
            StrategyKind::RenderedPage,
        ] {
            let wire = serde_json::to_value(kind).unwrap();
            assert_eq!(wire, kind.to_string());
        }
    }

    #[test]
    fn strategy_kind_wire_names_are_stable() {
        let names: Vec<_> = [
            StrategyKind::MarkupScan,
            StrategyKind::StructuredQuery,
            StrategyKind::RenderedPage,
        ]
        .into_iter()
        .map(|kind| serde_json::to_value(kind).unwrap())
        .collect();
        assert_eq!(
            names,
            vec![
                "time_tag_extraction",
                "cheerio_css_selector",
                "headless_browser"
            ]
        );
    }
}
