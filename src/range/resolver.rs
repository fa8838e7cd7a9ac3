//! Date Range Resolver
//!
//! Turns the raw, optional `from`/`to` strings of a request into a
//! validated `DateRange` under one domain's `RangePolicy`.
//!
//! # Defaults
//!
//! ```text
//! from  to    result
//! -     -     [today - default + 1, today]
//! F     -     [F, today]
//! -     T     [T - default + 1, T]
//! F     T     [F, T]
//! ```
//!
//! Checks run in order: date syntax, future `to`, `from > to`, span.

use chrono::NaiveDate;

use crate::range::error::{RangeError, RangeResult};
use crate::range::types::{DateRange, RangePolicy, DATE_FORMAT};

/// Resolves request bounds into a `DateRange` for one domain
#[derive(Debug, Clone, Copy)]
pub struct DateRangeResolver {
    policy: RangePolicy,
}

impl DateRangeResolver {
    pub fn new(policy: RangePolicy) -> Self {
        Self { policy }
    }

    /// The policy this resolver enforces
    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    /// Resolve optional bounds against `today`
    pub fn resolve(
        &self,
        from_raw: Option<&str>,
        to_raw: Option<&str>,
        today: NaiveDate,
    ) -> RangeResult<DateRange> {
        let from = parse_bound("from", from_raw)?;
        let to = parse_bound("to", to_raw)?;

        let to = to.unwrap_or(today);
        if to > today {
            return Err(RangeError::InvalidRange(format!(
                "to {} is in the future (today is {})",
                to.format(DATE_FORMAT),
                today.format(DATE_FORMAT)
            )));
        }

        let from = from.unwrap_or_else(|| self.policy.window_start(to));

        let range = DateRange::try_new(from, to).ok_or_else(|| {
            RangeError::InvalidRange(format!(
                "from {} is after to {}",
                from.format(DATE_FORMAT),
                to.format(DATE_FORMAT)
            ))
        })?;

        let span = range.span_days();
        if span > i64::from(self.policy.max_span_days) {
            return Err(RangeError::RangeTooLarge {
                span,
                max: self.policy.max_span_days,
            });
        }

        tracing::debug!(range = %range, "Resolved date range");
        Ok(range)
    }

    /// Resolve a single optional date (today when absent) into a one-day range
    pub fn resolve_day(&self, date_raw: Option<&str>, today: NaiveDate) -> RangeResult<DateRange> {
        let date = parse_bound("date", date_raw)?.unwrap_or(today);
        if date > today {
            return Err(RangeError::InvalidRange(format!(
                "date {} is in the future (today is {})",
                date.format(DATE_FORMAT),
                today.format(DATE_FORMAT)
            )));
        }
        Ok(DateRange::single(date))
    }
}

/// Parse one `yyyy-MM-dd` bound; blank counts as absent
pub fn parse_bound(name: &str, raw: Option<&str>) -> RangeResult<Option<NaiveDate>> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(s) => s,
    };

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| {
            RangeError::InvalidRange(format!(
                "{} '{}' is not a valid yyyy-MM-dd date",
                name, raw
            ))
        })
}
