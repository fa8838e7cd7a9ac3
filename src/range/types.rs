//! Calendar date range value types
//!
//! - `DateRange`: an inclusive `[from, to]` interval of whole days
//! - `RangePolicy`: default window and maximum span for one domain
//!
//! Unlike a timestamp range these are closed on both ends: a range from
//! 2024-01-01 to 2024-01-03 covers three days.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Wire format for every date crossing the API boundary
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    /// Create a range, returning None if `from > to`
    pub fn try_new(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        if from <= to {
            Some(Self { from, to })
        } else {
            None
        }
    }

    /// A range covering exactly one day
    pub fn single(date: NaiveDate) -> Self {
        Self {
            from: date,
            to: date,
        }
    }

    /// First day (inclusive)
    pub fn from(&self) -> NaiveDate {
        self.from
    }

    /// Last day (inclusive)
    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Number of calendar days covered, always >= 1
    pub fn span_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// Check if a date falls within this range
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    /// Iterate every day in ascending order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let to = self.to;
        self.from.iter_days().take_while(move |d| *d <= to)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}..{}",
            self.from.format(DATE_FORMAT),
            self.to.format(DATE_FORMAT)
        )
    }
}

/// Default window and maximum span for one domain's range queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangePolicy {
    /// Days covered when the caller omits `from`
    pub default_span_days: u32,
    /// Largest inclusive span accepted
    pub max_span_days: u32,
}

impl RangePolicy {
    pub const fn new(default_span_days: u32, max_span_days: u32) -> Self {
        Self {
            default_span_days,
            max_span_days,
        }
    }

    /// Water: last 7 days, never more than a week
    pub const fn water() -> Self {
        Self::new(7, 7)
    }

    /// Exercise and calories: last 7 days by default, up to a month
    pub const fn exercise() -> Self {
        Self::new(7, 31)
    }

    /// Weight: today only by default, up to a month
    pub const fn weight() -> Self {
        Self::new(1, 31)
    }

    /// A policy needs `1 <= default <= max`
    pub fn is_valid(&self) -> bool {
        self.default_span_days >= 1 && self.default_span_days <= self.max_span_days
    }

    /// Start of the default window ending on `to`
    pub(crate) fn window_start(&self, to: NaiveDate) -> NaiveDate {
        let back = u64::from(self.default_span_days.saturating_sub(1));
        to.checked_sub_days(Days::new(back))
            .unwrap_or(NaiveDate::MIN)
    }
}
