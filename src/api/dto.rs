//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! Field names are camelCase on the wire; dates are `yyyy-MM-dd`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::metric::TrackedMetric;
use crate::range::{DateRange, RangePolicy};
use crate::series::{DailySeries, DailySeriesPoint};

// ============================================
// RANGE DTOs
// ============================================

/// Optional bounds of a range request
#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// Optional date of a single-day request
#[derive(Debug, Default, Deserialize)]
pub struct DayParams {
    #[serde(default)]
    pub date: Option<String>,
}

/// Gap-filled series with its rollup
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeResponse {
    pub metric: TrackedMetric,
    pub unit: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub items: Vec<DailySeriesPoint>,
    /// Single entry keyed by the metric's total field (`amountMl`, `totalKcal`, ...)
    #[serde(flatten)]
    pub totals: HashMap<String, f64>,
    pub average: f64,
    pub active_days: u32,
}

impl RangeResponse {
    pub fn new(metric: TrackedMetric, range: &DateRange, series: DailySeries) -> Self {
        let mut totals = HashMap::new();
        totals.insert(metric.total_field().to_string(), series.stats.total);

        Self {
            metric,
            unit: metric.unit().to_string(),
            from: range.from(),
            to: range.to(),
            items: series.points,
            totals,
            average: series.stats.average,
            active_days: series.stats.active_days,
        }
    }
}

// ============================================
// INGEST DTOs
// ============================================

/// Log one value for a metric
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecordRequest {
    pub value: f64,
    /// Defaults to today
    #[serde(default)]
    pub date: Option<String>,
    /// Submission time (ms since epoch), defaults to now
    #[serde(default)]
    pub recorded_at: Option<i64>,
}

/// Create a tag
#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

// ============================================
// PAGE DTOs
// ============================================

/// Cursor and page size of a page request
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

// ============================================
// METRIC DTOs
// ============================================

/// Catalogue entry for one metric
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricInfo {
    pub name: String,
    pub unit: String,
    pub combine: String,
    pub fill: String,
    pub total_field: String,
    pub default_span_days: u32,
    pub max_span_days: u32,
}

impl MetricInfo {
    pub fn new(metric: TrackedMetric, policy: RangePolicy) -> Self {
        Self {
            name: metric.name().to_string(),
            unit: metric.unit().to_string(),
            combine: metric.combine_rule().to_string(),
            fill: metric.fill_policy().to_string(),
            total_field: metric.total_field().to_string(),
            default_span_days: policy.default_span_days,
            max_span_days: policy.max_span_days,
        }
    }
}

/// List metrics response
#[derive(Debug, Serialize)]
pub struct MetricListResponse {
    pub metrics: Vec<MetricInfo>,
    pub total: usize,
}

// ============================================
// EXPORT DTOs
// ============================================

/// Export query parameters
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    /// Format: csv, json, ndjson
    #[serde(default = "default_export_format")]
    pub format: String,
}

fn default_export_format() -> String {
    "csv".to_string()
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy or unhealthy
    pub status: String,
    /// Data source status
    pub source: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{CombineRule, DailyAggregator, FillPolicy, RawMetricRecord};

    #[test]
    fn test_range_response_shape() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let range = DateRange::try_new(day(1), day(3)).unwrap();
        let series = DailyAggregator::new(CombineRule::Sum, FillPolicy::Zero).aggregate(
            &range,
            &[
                RawMetricRecord::new(day(1), 500.0, 0),
                RawMetricRecord::new(day(3), 300.0, 0),
            ],
        );

        let json = serde_json::to_value(RangeResponse::new(TrackedMetric::Water, &range, series))
            .unwrap();

        assert_eq!(json["metric"], "water");
        assert_eq!(json["from"], "2024-01-01");
        assert_eq!(json["to"], "2024-01-03");
        assert_eq!(json["amountMl"], 800.0);
        assert_eq!(json["average"], 400.0);
        assert_eq!(json["activeDays"], 2);
        assert_eq!(json["items"][1]["date"], "2024-01-02");
        assert_eq!(json["items"][1]["value"], 0.0);
    }
}
