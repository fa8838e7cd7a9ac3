//! Metrics Routes
//!
//! Daily series endpoints for the tracked metrics.
//!
//! - GET /api/v1/metrics - List the metric catalogue
//! - GET /api/v1/metrics/:metric/range - Gap-filled series over a date range
//! - GET /api/v1/metrics/:metric/day - Single-day value
//! - POST /api/v1/metrics/:metric/records - Log a value

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::{
    DayParams, LogRecordRequest, MetricInfo, MetricListResponse, RangeParams, RangeResponse,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{ValidJson, ValidQuery};
use crate::api::routes::caller_id;
use crate::api::state::AppState;
use crate::metric::TrackedMetric;
use crate::range::DateRange;
use crate::series::DailySeries;
use crate::source::{LogEntry, NewEntry};

/// GET /api/v1/metrics
pub async fn list_metrics(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MetricListResponse>> {
    let metrics: Vec<MetricInfo> = TrackedMetric::all()
        .iter()
        .map(|m| MetricInfo::new(*m, state.config.ranges.policy_for(*m)))
        .collect();

    Ok(Json(MetricListResponse {
        total: metrics.len(),
        metrics,
    }))
}

/// GET /api/v1/metrics/:metric/range?from&to
///
/// Missing `to` means today; missing `from` means the metric's default window.
pub async fn metric_range(
    State(state): State<Arc<AppState>>,
    Path(metric): Path<String>,
    headers: HeaderMap,
    ValidQuery(params): ValidQuery<RangeParams>,
) -> ApiResult<Json<RangeResponse>> {
    let metric: TrackedMetric = metric.parse()?;
    let range = state.resolver(metric).resolve(
        params.from.as_deref(),
        params.to.as_deref(),
        state.today(),
    )?;

    let series = load_series(&state, &caller_id(&headers), metric, &range).await?;

    Ok(Json(RangeResponse::new(metric, &range, series)))
}

/// GET /api/v1/metrics/:metric/day?date
pub async fn metric_day(
    State(state): State<Arc<AppState>>,
    Path(metric): Path<String>,
    headers: HeaderMap,
    ValidQuery(params): ValidQuery<DayParams>,
) -> ApiResult<Json<RangeResponse>> {
    let metric: TrackedMetric = metric.parse()?;
    let range = state
        .resolver(metric)
        .resolve_day(params.date.as_deref(), state.today())?;

    let series = load_series(&state, &caller_id(&headers), metric, &range).await?;

    Ok(Json(RangeResponse::new(metric, &range, series)))
}

/// POST /api/v1/metrics/:metric/records
pub async fn log_record(
    State(state): State<Arc<AppState>>,
    Path(metric): Path<String>,
    headers: HeaderMap,
    ValidJson(req): ValidJson<LogRecordRequest>,
) -> ApiResult<(StatusCode, Json<LogEntry>)> {
    let metric: TrackedMetric = metric.parse()?;

    if !req.value.is_finite() {
        return Err(ApiError::Validation("value must be a finite number".to_string()));
    }

    let date = state
        .resolver(metric)
        .resolve_day(req.date.as_deref(), state.today())?
        .from();
    let recorded_at = req
        .recorded_at
        .unwrap_or_else(|| Utc::now().timestamp_millis());

    let user_id = caller_id(&headers);
    let entry = state
        .source
        .log_metric(&user_id, NewEntry::new(metric, date, req.value, recorded_at))
        .await?;

    tracing::info!(
        user = %user_id,
        metric = %metric,
        date = %entry.date,
        value = entry.value,
        "Logged metric value"
    );

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Fetch the raw records for `range` and fold them into a daily series
pub(crate) async fn load_series(
    state: &AppState,
    user_id: &str,
    metric: TrackedMetric,
    range: &DateRange,
) -> ApiResult<DailySeries> {
    let records = state.source.metric_records(user_id, metric, range).await?;

    tracing::debug!(
        metric = %metric,
        range = %range,
        records = records.len(),
        "Aggregating daily series"
    );

    Ok(metric.aggregator().aggregate(range, &records))
}
