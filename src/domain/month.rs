use crate::error::{JournalError, Result};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display names for the twelve billing months, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "Yanvar", "Fevral", "Mart", "Aprel", "May", "Iyun", "Iyul", "Avgust", "Sentyabr", "Oktyabr",
    "Noyabr", "Dekabr",
];

/// A billing month of the year, always in `[0, 11]` (January is `0`).
///
/// Construction is the only validation boundary: every value of this type
/// is in range, so arithmetic on it never needs re-checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct MonthIndex(u8);

impl MonthIndex {
    pub const JANUARY: Self = Self(0);
    pub const DECEMBER: Self = Self(11);

    /// Validates a raw month index, rejecting anything outside `[0, 11]`.
    pub fn new(value: i64) -> Result<Self> {
        if (0..12).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(JournalError::InvalidMonth(value))
        }
    }

    /// Normalizes any integer onto the month cycle (`-1` is December, `12` is January).
    pub fn wrapping(value: i64) -> Self {
        Self(value.rem_euclid(12) as u8)
    }

    /// The calendar month of `now`.
    pub fn of(now: DateTime<Utc>) -> Self {
        Self(now.month0() as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// The following month, wrapping December to January.
    pub fn next(self) -> Self {
        Self::wrapping(i64::from(self.0) + 1)
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[usize::from(self.0)]
    }
}

impl TryFrom<i64> for MonthIndex {
    type Error = JournalError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<MonthIndex> for u8 {
    fn from(month: MonthIndex) -> Self {
        month.0
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Absolute month counter (`year * 12 + month`), comparable across years.
pub fn absolute_month(year: i32, month: MonthIndex) -> i64 {
    i64::from(year) * 12 + i64::from(month.value())
}
