//! Daybook Daily Series
//!
//! Turns raw metric records into a complete day-by-day series:
//!
//! - **types**: records, points, stats and the per-metric rules
//! - **aggregator**: `DailyAggregator`, the gap-filling rollup
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use daybook::range::DateRange;
//! use daybook::series::{CombineRule, DailyAggregator, FillPolicy, RawMetricRecord};
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let range = DateRange::try_new(day(1), day(3)).unwrap();
//! let records = [
//!     RawMetricRecord::new(day(1), 500.0, 0),
//!     RawMetricRecord::new(day(3), 300.0, 0),
//! ];
//!
//! let series = DailyAggregator::new(CombineRule::Sum, FillPolicy::Zero).aggregate(&range, &records);
//! assert_eq!(series.points.len(), 3);
//! assert_eq!(series.stats.total, 800.0);
//! assert_eq!(series.stats.average, 400.0);
//! ```

pub mod aggregator;
pub mod types;

pub use aggregator::DailyAggregator;
pub use types::{
    AggregateStats, CombineRule, DailySeries, DailySeriesPoint, FillPolicy, RawMetricRecord,
};
