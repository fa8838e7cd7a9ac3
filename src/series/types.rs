//! Daily series data types
//!
//! - `RawMetricRecord`: one logged value as handed over by the data source
//! - `DailySeriesPoint`: one gap-filled calendar day
//! - `AggregateStats`: rollup over a whole range
//! - `FillPolicy` and `CombineRule`: per-metric shaping rules

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single logged value for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetricRecord {
    /// Day the value belongs to
    pub date: NaiveDate,
    /// The logged amount
    pub value: f64,
    /// Unix timestamp in milliseconds when the value was submitted
    pub recorded_at: i64,
}

impl RawMetricRecord {
    pub fn new(date: NaiveDate, value: f64, recorded_at: i64) -> Self {
        Self {
            date,
            value,
            recorded_at,
        }
    }
}

/// One day of a gap-filled series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailySeriesPoint {
    pub date: NaiveDate,
    /// `None` only under `FillPolicy::None` / unseeded `CarryForward`
    pub value: Option<f64>,
}

/// Rollup statistics for a series
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Sum of all non-null series values
    pub total: f64,
    /// `total / active_days`, or 0 with no active days
    pub average: f64,
    /// Days with at least one raw record
    pub active_days: u32,
}

/// A gap-filled series and its stats
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySeries {
    pub points: Vec<DailySeriesPoint>,
    pub stats: AggregateStats,
}

/// What a day without records is worth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Nothing recorded means zero (water, exercise)
    Zero,
    /// Repeat the previous day's value within the range
    CarryForward,
    /// Leave the day empty (weight)
    None,
}

impl std::fmt::Display for FillPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FillPolicy::Zero => write!(f, "zero"),
            FillPolicy::CarryForward => write!(f, "carry_forward"),
            FillPolicy::None => write!(f, "none"),
        }
    }
}

/// How several records on the same day collapse into one value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombineRule {
    /// Cumulative amounts add up
    Sum,
    /// Point-in-time readings: the most recently submitted wins
    Latest,
}

impl std::fmt::Display for CombineRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombineRule::Sum => write!(f, "sum"),
            CombineRule::Latest => write!(f, "latest"),
        }
    }
}
