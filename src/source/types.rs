//! Records owned by the data source
//!
//! Content items (`FoodItem`, `Tag`) and the merged `LogEntry` feed. Each
//! knows its own pagination sort key.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metric::TrackedMetric;
use crate::pagination::CursorKey;
use crate::series::RawMetricRecord;

/// One logged health value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: i64,
    pub metric: TrackedMetric,
    pub date: NaiveDate,
    pub value: f64,
    /// Unix timestamp in milliseconds
    pub recorded_at: i64,
}

impl LogEntry {
    /// Feed order is newest first by (recorded_at, id)
    pub fn cursor_key(&self) -> CursorKey {
        CursorKey::Timestamped {
            timestamp: self.recorded_at,
            id: self.id,
        }
    }

    pub fn to_record(&self) -> RawMetricRecord {
        RawMetricRecord::new(self.date, self.value, self.recorded_at)
    }
}

/// A health value to log, with every field known up front
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewEntry {
    pub metric: TrackedMetric,
    pub date: NaiveDate,
    pub value: f64,
    pub recorded_at: i64,
}

impl NewEntry {
    pub fn new(metric: TrackedMetric, date: NaiveDate, value: f64, recorded_at: i64) -> Self {
        Self {
            metric,
            date,
            value,
            recorded_at,
        }
    }
}

/// A user-defined food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    pub kcal_per_serving: f64,
    #[serde(default)]
    pub serving_size: Option<String>,
    /// Unix timestamp in milliseconds
    pub created_at: i64,
}

impl FoodItem {
    /// Foods are listed newest first by id
    pub fn cursor_key(&self) -> CursorKey {
        CursorKey::Id(self.id)
    }
}

/// Fields for a food about to be created
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFood {
    pub name: String,
    pub kcal_per_serving: f64,
    #[serde(default)]
    pub serving_size: Option<String>,
}

/// A user-defined label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: i64,
    pub name: String,
    /// Unix timestamp in milliseconds
    pub created_at: i64,
}

impl Tag {
    /// Tags are listed oldest first by id
    pub fn cursor_key(&self) -> CursorKey {
        CursorKey::Id(self.id)
    }
}
