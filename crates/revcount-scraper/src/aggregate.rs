//! Per-day review counting.

use revcount_core::DateCounts;

use crate::normalize::normalize_date;

/// Normalizes every token and counts occurrences per canonical date.
///
/// Tokens that fail normalization are dropped silently; they are neither
/// counted nor reported. The resulting total is therefore at most
/// `tokens.len()`.
pub fn aggregate_dates<I, S>(tokens: I) -> DateCounts
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut skipped = 0usize;
    let counts = tokens
        .into_iter()
        .filter_map(|token| {
            let normalized = normalize_date(token.as_ref());
            if normalized.is_none() {
                skipped += 1;
            }
            normalized
        })
        .collect::<DateCounts>();

    if skipped > 0 {
        tracing::debug!(skipped, "dropped unparseable date tokens");
    }
    counts
}
