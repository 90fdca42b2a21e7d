//! Normalization of raw review date text into [`CanonicalDate`] keys.
//!
//! The review list prints dates in three shapes depending on age and page
//! variant: `"8.8.금"` (with a weekday syllable), `"8월 8일"`, and a bare
//! `"8.8"`. All three collapse to the same key.

use std::sync::LazyLock;

use regex::Regex;
use revcount_core::CanonicalDate;

static WEEKDAY_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\.(\d{1,2})\.[가-힣]$").expect("valid weekday suffix regex")
});
static KOREAN_UNITS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\s*월\s*(\d{1,2})\s*일$").expect("valid month-day unit regex")
});
static BARE_MONTH_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})$").expect("valid month-day regex"));

/// Maps one raw date token to its canonical `month.day`, or `None` when the
/// token matches no known shape or has an out-of-range component.
///
/// Shapes are tried in a fixed order and the first one that matches decides
/// the outcome: a token that matches the weekday shape but has month 13 is
/// rejected outright rather than retried against the later shapes.
#[must_use]
pub fn normalize_date(raw: &str) -> Option<CanonicalDate> {
    let raw = raw.trim();

    let captures = [&*WEEKDAY_SUFFIX_RE, &*KOREAN_UNITS_RE, &*BARE_MONTH_DAY_RE]
        .into_iter()
        .find_map(|re| re.captures(raw))?;

    let month = captures.get(1)?.as_str().parse::<u32>().ok()?;
    let day = captures.get(2)?.as_str().parse::<u32>().ok()?;
    CanonicalDate::new(month, day)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
