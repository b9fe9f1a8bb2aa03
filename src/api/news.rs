//! News API endpoints
//!
//! Handles HTTP requests for news management:
//! - GET /api/v1/news - Filtered, paginated news list
//! - POST /api/v1/news - Create news
//! - GET /api/v1/news/{uuid} - Get news with topics
//! - PUT /api/v1/news/{uuid} - Edit a draft
//! - DELETE /api/v1/news/{uuid} - Soft delete
//! - PUT /api/v1/news/status/{uuid} - Status transition

use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Router,
};
use serde::Deserialize;

use crate::api::common::{resolve_pagination, JsonBody};
use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{ApiResponse, Meta, NewsResponse};
use crate::models::{CreateNewsInput, UpdateNewsInput, UpdateNewsStatusInput};
use crate::services::NewsService;

/// Query parameters for the news list
#[derive(Debug, Default, Deserialize)]
pub struct ListNewsQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
    /// Title substring
    pub filter: Option<String>,
    /// Topic value
    pub topic: Option<String>,
    pub status: Option<String>,
}

/// Build the news router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/news", get(list_news).post(create_news))
        .route("/news/status/{uuid}", put(update_news_status))
        .route(
            "/news/{uuid}",
            get(get_news).put(update_news).delete(delete_news),
        )
}

/// GET /api/v1/news - List news with pagination metadata
async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<ListNewsQuery>,
) -> Result<ApiResponse<Vec<NewsResponse>>, ApiError> {
    let pagination = resolve_pagination(
        query.page.as_deref(),
        query.per_page.as_deref(),
        &state.pagination,
    );
    let filter = NewsService::build_filter(
        query.filter.as_deref(),
        query.topic.as_deref(),
        query.status.as_deref(),
    )?;

    let page = state
        .news_service
        .list(pagination, &filter)
        .await?
        .map(NewsResponse::from);

    let meta = Meta::from_page(&page);
    Ok(ApiResponse::ok("Data Found", page.items).with_meta(meta))
}

/// GET /api/v1/news/{uuid}
async fn get_news(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<ApiResponse<NewsResponse>, ApiError> {
    let news = state.news_service.get_by_uuid(&uuid).await?;
    Ok(ApiResponse::ok("Data Found", news.into()))
}

/// POST /api/v1/news
async fn create_news(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateNewsInput>,
) -> Result<ApiResponse<NewsResponse>, ApiError> {
    let news = state.news_service.create(input).await?;
    Ok(ApiResponse::created("News created successfully", news.into()))
}

/// PUT /api/v1/news/{uuid} - Only drafts accept edits
async fn update_news(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    JsonBody(input): JsonBody<UpdateNewsInput>,
) -> Result<ApiResponse<NewsResponse>, ApiError> {
    let news = state.news_service.update_by_uuid(&uuid, input).await?;
    Ok(ApiResponse::ok("News updated successfully", news.into()))
}

/// DELETE /api/v1/news/{uuid}
async fn delete_news(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<ApiResponse<NewsResponse>, ApiError> {
    let news = state.news_service.delete_by_uuid(&uuid).await?;
    Ok(ApiResponse::ok("News deleted successfully", news.into()))
}

/// PUT /api/v1/news/status/{uuid}
async fn update_news_status(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    JsonBody(input): JsonBody<UpdateNewsStatusInput>,
) -> Result<ApiResponse<NewsResponse>, ApiError> {
    let news = state.news_service.update_status(&uuid, input).await?;
    Ok(ApiResponse::ok("News status updated successfully", news.into()))
}
