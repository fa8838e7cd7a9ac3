//! # Daybook
//!
//! Personal health tracking backend: daily series over date ranges and
//! cursor-paginated collections.
//!
//! ## Features
//!
//! - **Range resolution**: optional `from`/`to` bounds become a validated,
//!   inclusive calendar-day window with per-metric defaults and caps
//! - **Daily aggregation**: raw records fold into one gap-filled point per day
//!   with total, average and active-day statistics
//! - **Cursor pagination**: opaque cursors over stable sort keys with
//!   limit+1 lookahead for `has_more`
//!
//! ## Modules
//!
//! - [`range`]: Date range resolution and the clock
//! - [`series`]: Daily aggregation
//! - [`pagination`]: Cursor codec and paginator
//! - [`source`]: Data source trait and in-memory store
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust
//! use daybook::range::{DateRangeResolver, RangePolicy};
//! use daybook::series::RawMetricRecord;
//! use daybook::TrackedMetric;
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
//! let range = DateRangeResolver::new(RangePolicy::water())
//!     .resolve(Some("2024-01-01"), None, today)
//!     .unwrap();
//!
//! let records = vec![
//!     RawMetricRecord::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 500.0, 0),
//!     RawMetricRecord::new(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), 300.0, 0),
//! ];
//! let series = TrackedMetric::Water.aggregator().aggregate(&range, &records);
//!
//! assert_eq!(series.points.len(), 3);
//! assert_eq!(series.stats.total, 800.0);
//! assert_eq!(series.stats.average, 400.0);
//! ```

pub mod api;
pub mod config;
pub mod logging;
pub mod metric;
pub mod pagination;
pub mod range;
pub mod series;
pub mod source;

// Re-export top-level types for convenience
pub use range::{
    Clock, DateRange, DateRangeResolver, FixedClock, RangeError, RangePolicy, RangeResult,
    SystemClock,
};

pub use series::{
    AggregateStats, CombineRule, DailyAggregator, DailySeries, DailySeriesPoint, FillPolicy,
    RawMetricRecord,
};

pub use pagination::{
    Cursor, CursorCodec, CursorKey, CursorPaginator, KeyKind, Page, PaginationError,
    PaginationResult,
};

pub use metric::{TrackedMetric, UnknownMetric};

pub use source::{
    DataSource, FoodItem, InMemoryStore, LogEntry, NewEntry, NewFood, SourceError, SourceResult,
    Tag,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{
    ApiConfig, ClockConfig, Config, ConfigError, ConfigLoad, LoggingConfig, PaginationConfig,
    RangesConfig,
};
