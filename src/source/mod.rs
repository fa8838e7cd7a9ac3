//! Daybook Data Sources
//!
//! The engine never touches storage. Everything it aggregates or pages is
//! fetched through `DataSource`, which any backend can implement.
//!
//! Paging contract for the `*_after` methods: return at most `fetch` rows,
//! in the collection's sort order, strictly after `after` (or from the
//! start when `after` is `None`).
//!
//! | Collection | Order | Key |
//! |---|---|---|
//! | foods | newest first | `Id` descending |
//! | tags | oldest first | `Id` ascending |
//! | entries | newest first | `(recorded_at, id)` descending |

pub mod memory;
pub mod types;

pub use memory::InMemoryStore;
pub use types::{FoodItem, LogEntry, NewEntry, NewFood, Tag};

use async_trait::async_trait;
use thiserror::Error;

use crate::metric::TrackedMetric;
use crate::pagination::CursorKey;
use crate::range::DateRange;
use crate::series::RawMetricRecord;

/// Errors raised by a data source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Rejected input (empty name, negative amount, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Item clashes with an existing one
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backend could not serve the request
    #[error("Data source unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for data source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Data-access collaborator for the engine
#[async_trait]
pub trait DataSource: Send + Sync {
    /// All records of `metric` dated within `range`, in any order
    async fn metric_records(
        &self,
        user_id: &str,
        metric: TrackedMetric,
        range: &DateRange,
    ) -> SourceResult<Vec<RawMetricRecord>>;

    /// Foods, newest first
    async fn foods_after(
        &self,
        user_id: &str,
        after: Option<CursorKey>,
        fetch: usize,
    ) -> SourceResult<Vec<FoodItem>>;

    /// Tags, oldest first
    async fn tags_after(
        &self,
        user_id: &str,
        after: Option<CursorKey>,
        fetch: usize,
    ) -> SourceResult<Vec<Tag>>;

    /// Log entries across every metric, newest first
    async fn entries_after(
        &self,
        user_id: &str,
        after: Option<CursorKey>,
        fetch: usize,
    ) -> SourceResult<Vec<LogEntry>>;

    async fn log_metric(&self, user_id: &str, entry: NewEntry) -> SourceResult<LogEntry>;

    async fn create_food(&self, user_id: &str, food: NewFood) -> SourceResult<FoodItem>;

    async fn create_tag(&self, user_id: &str, name: &str) -> SourceResult<Tag>;

    /// Cheap liveness check for readiness checks
    async fn ping(&self) -> SourceResult<()>;
}
