//! Collection Routes
//!
//! Cursor-paginated listings of user content and the entry feed.
//!
//! - GET /api/v1/foods - Foods, newest first
//! - POST /api/v1/foods - Create a food
//! - GET /api/v1/tags - Tags, oldest first
//! - POST /api/v1/tags - Create a tag
//! - GET /api/v1/entries - Logged values across every metric, newest first

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CreateTagRequest, PageParams};
use crate::api::error::ApiResult;
use crate::api::extract::{ValidJson, ValidQuery};
use crate::api::routes::caller_id;
use crate::api::state::AppState;
use crate::pagination::{CursorCodec, CursorKey, CursorPaginator, Page};
use crate::source::{FoodItem, LogEntry, NewFood, Tag};

/// A validated page request for one collection
struct PageRequest {
    paginator: CursorPaginator,
    after: Option<CursorKey>,
    fetch: usize,
    limit: i64,
}

impl PageRequest {
    fn new(state: &AppState, params: &PageParams, codec: CursorCodec) -> ApiResult<Self> {
        let limit = state.config.pagination.effective_limit(params.limit);
        let fetch = CursorPaginator::fetch_limit(limit)?;
        let paginator = CursorPaginator::new(codec);
        let after = paginator.codec().decode(params.cursor.as_deref());

        Ok(Self {
            paginator,
            after,
            fetch,
            limit,
        })
    }
}

/// GET /api/v1/foods?cursor&limit
pub async fn list_foods(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidQuery(params): ValidQuery<PageParams>,
) -> ApiResult<Json<Page<FoodItem>>> {
    let req = PageRequest::new(&state, &params, CursorCodec::ids())?;
    let rows = state
        .source
        .foods_after(&caller_id(&headers), req.after, req.fetch)
        .await?;

    Ok(Json(req.paginator.paginate(rows, req.limit, FoodItem::cursor_key)?))
}

/// POST /api/v1/foods
pub async fn create_food(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidJson(food): ValidJson<NewFood>,
) -> ApiResult<(StatusCode, Json<FoodItem>)> {
    let food = state.source.create_food(&caller_id(&headers), food).await?;
    tracing::info!(id = food.id, name = %food.name, "Created food");
    Ok((StatusCode::CREATED, Json(food)))
}

/// GET /api/v1/tags?cursor&limit
pub async fn list_tags(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidQuery(params): ValidQuery<PageParams>,
) -> ApiResult<Json<Page<Tag>>> {
    let req = PageRequest::new(&state, &params, CursorCodec::ids())?;
    let rows = state
        .source
        .tags_after(&caller_id(&headers), req.after, req.fetch)
        .await?;

    Ok(Json(req.paginator.paginate(rows, req.limit, Tag::cursor_key)?))
}

/// POST /api/v1/tags
pub async fn create_tag(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidJson(req): ValidJson<CreateTagRequest>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    let tag = state.source.create_tag(&caller_id(&headers), &req.name).await?;
    tracing::info!(id = tag.id, name = %tag.name, "Created tag");
    Ok((StatusCode::CREATED, Json(tag)))
}

/// GET /api/v1/entries?cursor&limit
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidQuery(params): ValidQuery<PageParams>,
) -> ApiResult<Json<Page<LogEntry>>> {
    let req = PageRequest::new(&state, &params, CursorCodec::timestamped())?;
    let rows = state
        .source
        .entries_after(&caller_id(&headers), req.after, req.fetch)
        .await?;

    Ok(Json(req.paginator.paginate(rows, req.limit, LogEntry::cursor_key)?))
}
