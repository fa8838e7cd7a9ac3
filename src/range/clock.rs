//! Source of "today"
//!
//! Range resolution never reads the wall clock itself; it is handed a date
//! by a `Clock` so results are reproducible.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};

/// Supplies the current calendar date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock shifted into a fixed UTC offset
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Clock in UTC
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Clock at `minutes` east of UTC; out-of-range offsets fall back to UTC
    pub fn with_offset_minutes(minutes: i32) -> Self {
        match minutes.checked_mul(60).and_then(FixedOffset::east_opt) {
            Some(offset) => Self { offset },
            None => {
                tracing::warn!(minutes, "UTC offset out of range, using UTC");
                Self::utc()
            }
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }
}

/// Clock pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(FixedClock(date).today(), date);
    }

    #[test]
    fn test_offset_clock_within_a_day_of_utc() {
        let utc_today = SystemClock::utc().today();
        let east = SystemClock::with_offset_minutes(14 * 60).today();
        let west = SystemClock::with_offset_minutes(-12 * 60).today();

        assert!((east - utc_today).num_days().abs() <= 1);
        assert!((west - utc_today).num_days().abs() <= 1);
    }

    #[test]
    fn test_invalid_offset_falls_back() {
        let clock = SystemClock::with_offset_minutes(48 * 60);
        assert_eq!(clock.offset, Utc.fix());
    }
}
