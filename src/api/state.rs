//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::metric::TrackedMetric;
use crate::range::{Clock, DateRangeResolver, SystemClock};
use crate::source::DataSource;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Where records, foods, tags and entries come from
    pub source: Arc<dyn DataSource>,
    /// Full configuration (range policies, page limits, API settings)
    pub config: Arc<Config>,
    /// Decides which day is "today"
    pub clock: Arc<dyn Clock>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state using the wall clock at the configured UTC offset
    pub fn new(source: Arc<dyn DataSource>, config: Config) -> Self {
        let clock = SystemClock::with_offset_minutes(config.clock.utc_offset_minutes);
        Self::with_clock(source, config, Arc::new(clock))
    }

    /// Create state with an explicit clock
    pub fn with_clock(source: Arc<dyn DataSource>, config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            config: Arc::new(config),
            clock,
            start_time: Instant::now(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Resolver configured with the metric's range policy
    pub fn resolver(&self, metric: TrackedMetric) -> DateRangeResolver {
        DateRangeResolver::new(self.config.ranges.policy_for(metric))
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
