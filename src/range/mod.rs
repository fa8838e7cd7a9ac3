//! Daybook Date Ranges
//!
//! Everything needed to turn a request's optional date bounds into a
//! validated, inclusive range of calendar days:
//!
//! - **types**: `DateRange` and per-domain `RangePolicy`
//! - **resolver**: `DateRangeResolver` applying defaults and limits
//! - **clock**: injectable source of "today"
//! - **error**: `RangeError`
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use daybook::range::{DateRangeResolver, RangePolicy};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//! let resolver = DateRangeResolver::new(RangePolicy::water());
//!
//! let range = resolver.resolve(None, None, today).unwrap();
//! assert_eq!(range.span_days(), 7);
//! ```

pub mod clock;
pub mod error;
pub mod resolver;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{RangeError, RangeResult};
pub use resolver::{parse_bound, DateRangeResolver};
pub use types::{DateRange, RangePolicy, DATE_FORMAT};
