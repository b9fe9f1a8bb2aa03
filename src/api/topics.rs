//! Topic API endpoints
//!
//! Handles HTTP requests for topic management:
//! - GET /api/v1/topics - Paginated topic list
//! - POST /api/v1/topic - Create topic
//! - GET /api/v1/topic/{uuid} - Get topic
//! - PUT /api/v1/topic/{uuid} - Update topic title
//! - DELETE /api/v1/topic/{uuid} - Delete topic

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};

use crate::api::common::{JsonBody, PaginationQuery};
use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{ApiResponse, Meta, TopicResponse};
use crate::models::{CreateTopicInput, UpdateTopicInput};

/// Build the topics router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/topics", get(list_topics))
        .route("/topic", axum::routing::post(create_topic))
        .route(
            "/topic/{uuid}",
            get(get_topic).put(update_topic).delete(delete_topic),
        )
}

/// GET /api/v1/topics - List topics with pagination metadata
async fn list_topics(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<ApiResponse<Vec<TopicResponse>>, ApiError> {
    let pagination = query.resolve(&state.pagination);
    let page = state
        .topic_service
        .list(pagination)
        .await?
        .map(TopicResponse::from);

    let meta = Meta::from_page(&page);
    Ok(ApiResponse::ok("Data Found", page.items).with_meta(meta))
}

/// GET /api/v1/topic/{uuid}
async fn get_topic(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<ApiResponse<TopicResponse>, ApiError> {
    let topic = state.topic_service.get_by_uuid(&uuid).await?;
    Ok(ApiResponse::ok("Data Found", topic.into()))
}

/// POST /api/v1/topic
async fn create_topic(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateTopicInput>,
) -> Result<ApiResponse<TopicResponse>, ApiError> {
    let topic = state.topic_service.create(input).await?;
    Ok(ApiResponse::created("Topic created successfully", topic.into()))
}

/// PUT /api/v1/topic/{uuid}
async fn update_topic(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    JsonBody(input): JsonBody<UpdateTopicInput>,
) -> Result<ApiResponse<TopicResponse>, ApiError> {
    let topic = state.topic_service.update_by_uuid(&uuid, input).await?;
    Ok(ApiResponse::ok("Topic updated successfully", topic.into()))
}

/// DELETE /api/v1/topic/{uuid}
async fn delete_topic(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    state.topic_service.delete_by_uuid(&uuid).await?;
    Ok(ApiResponse::message("Topic deleted successfully"))
}
