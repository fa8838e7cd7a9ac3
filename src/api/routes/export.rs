//! Export Routes
//!
//! Download a metric's gap-filled daily series.
//!
//! - GET /api/v1/metrics/:metric/export?from&to&format=csv|json|ndjson

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::dto::{ExportParams, RangeResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::ValidQuery;
use crate::api::routes::caller_id;
use crate::api::routes::metrics::load_series;
use crate::api::state::AppState;
use crate::metric::TrackedMetric;
use crate::series::DailySeriesPoint;

/// Supported download formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Csv,
    Json,
    Ndjson,
}

impl ExportFormat {
    fn parse(s: &str) -> ApiResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "ndjson" => Ok(ExportFormat::Ndjson),
            other => Err(ApiError::Validation(format!(
                "Unknown export format '{}'. Use csv, json, or ndjson",
                other
            ))),
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
            ExportFormat::Ndjson => "application/x-ndjson",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Ndjson => "ndjson",
        }
    }
}

/// GET /api/v1/metrics/:metric/export
pub async fn export_metric(
    State(state): State<Arc<AppState>>,
    Path(metric): Path<String>,
    headers: HeaderMap,
    ValidQuery(params): ValidQuery<ExportParams>,
) -> ApiResult<Response> {
    let metric: TrackedMetric = metric.parse()?;
    let format = ExportFormat::parse(&params.format)?;
    let range = state.resolver(metric).resolve(
        params.from.as_deref(),
        params.to.as_deref(),
        state.today(),
    )?;

    let series = load_series(&state, &caller_id(&headers), metric, &range).await?;
    let response = RangeResponse::new(metric, &range, series);

    let body = match format {
        ExportFormat::Csv => format_csv(&response.items)?,
        ExportFormat::Json => serde_json::to_vec_pretty(&response)
            .map_err(|e| ApiError::Internal(format!("JSON encoding failed: {}", e)))?,
        ExportFormat::Ndjson => format_ndjson(&response.items)?,
    };

    let filename = format!(
        "daybook_{}_{}_{}.{}",
        metric,
        range.from(),
        range.to(),
        format.extension()
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        Body::from(body),
    )
        .into_response())
}

/// `date,value` rows; an unfilled day has an empty value
fn format_csv(points: &[DailySeriesPoint]) -> ApiResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["date", "value"])
        .map_err(|e| ApiError::Internal(format!("CSV encoding failed: {}", e)))?;

    for point in points {
        let value = point.value.map(|v| v.to_string()).unwrap_or_default();
        writer
            .write_record([point.date.to_string(), value])
            .map_err(|e| ApiError::Internal(format!("CSV encoding failed: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("CSV encoding failed: {}", e)))
}

fn format_ndjson(points: &[DailySeriesPoint]) -> ApiResult<Vec<u8>> {
    let mut out = Vec::new();
    for point in points {
        serde_json::to_writer(&mut out, point)
            .map_err(|e| ApiError::Internal(format!("JSON encoding failed: {}", e)))?;
        out.push(b'\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn points() -> Vec<DailySeriesPoint> {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        vec![
            DailySeriesPoint {
                date: day(1),
                value: Some(80.5),
            },
            DailySeriesPoint {
                date: day(2),
                value: None,
            },
        ]
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(ExportFormat::parse("CSV").unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::parse("ndjson").unwrap(), ExportFormat::Ndjson);
        assert!(matches!(
            ExportFormat::parse("xml"),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_csv_leaves_unfilled_days_empty() {
        let csv = String::from_utf8(format_csv(&points()).unwrap()).unwrap();
        assert_eq!(csv, "date,value\n2024-03-01,80.5\n2024-03-02,\n");
    }

    #[test]
    fn test_ndjson_one_point_per_line() {
        let out = String::from_utf8(format_ndjson(&points()).unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], r#"{"date":"2024-03-02","value":null}"#);
    }
}
