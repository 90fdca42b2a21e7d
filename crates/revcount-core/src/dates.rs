//! Month-day review dates and per-day counts.
//!
//! The review site never prints a year, so a [`CanonicalDate`] is only a
//! month and a day. Reviews from the same month-day of different years
//! share a key; that is a known limitation of the source data.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A `month.day` aggregation key with `1 <= month <= 12` and `1 <= day <= 31`.
///
/// Renders without zero padding (`"8.8"`, `"12.31"`), so two spellings of
/// the same day always produce the same string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalDate {
    month: u8,
    day: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid canonical date \"{input}\": expected M.D with 1-12 and 1-31")]
pub struct InvalidDate {
    pub input: String,
}

impl CanonicalDate {
    /// Returns `None` when either component is out of range. Day-of-month is
    /// not checked against the month length.
    #[must_use]
    pub fn new(month: u32, day: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        Some(Self {
            month: u8::try_from(month).ok()?,
            day: u8::try_from(day).ok()?,
        })
    }

    #[must_use]
    pub fn month(self) -> u32 {
        u32::from(self.month)
    }

    #[must_use]
    pub fn day(self) -> u32 {
        u32::from(self.day)
    }
}

impl fmt::Display for CanonicalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.month, self.day)
    }
}

/// Strict `M.D` parsing, used for lookup keys supplied by callers.
impl FromStr for CanonicalDate {
    type Err = InvalidDate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidDate {
            input: s.to_owned(),
        };
        let (month, day) = s.trim().split_once('.').ok_or_else(invalid)?;
        let is_number = |part: &str| {
            !part.is_empty() && part.len() <= 2 && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !is_number(month) || !is_number(day) {
            return Err(invalid());
        }
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        let day = day.parse::<u32>().map_err(|_| invalid())?;
        Self::new(month, day).ok_or_else(invalid)
    }
}

impl Serialize for CanonicalDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CanonicalDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Occurrence count per [`CanonicalDate`].
///
/// Backed by a `BTreeMap` so enumeration order is the calendar order and
/// never depends on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateCounts(BTreeMap<CanonicalDate, usize>);

impl DateCounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, date: CanonicalDate) {
        *self.0.entry(date).or_insert(0) += 1;
    }

    /// Count for `date`, `0` when the date never occurred.
    #[must_use]
    pub fn get(&self, date: CanonicalDate) -> usize {
        self.0.get(&date).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalDate, usize)> + '_ {
        self.0.iter().map(|(date, count)| (*date, *count))
    }
}

impl FromIterator<CanonicalDate> for DateCounts {
    fn from_iter<I: IntoIterator<Item = CanonicalDate>>(iter: I) -> Self {
        let mut counts = Self::new();
        for date in iter {
            counts.increment(date);
        }
        counts
    }
}
