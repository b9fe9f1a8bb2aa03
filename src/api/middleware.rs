//! Shared API state and error handling
//!
//! Contains:
//! - `AppState` holding the services injected into every handler
//! - `ApiError`, the `{code, message}` error envelope, and its mapping from
//!   service errors to HTTP status codes

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::PaginationConfig;
use crate::services::{NewsService, NewsServiceError, TopicService, TopicServiceError};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub news_service: Arc<NewsService>,
    pub topic_service: Arc<TopicService>,
    pub pagination: PaginationConfig,
}

impl AppState {
    pub fn new(
        news_service: Arc<NewsService>,
        topic_service: Arc<TopicService>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            news_service,
            topic_service,
            pagination,
        }
    }
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Log the cause and hide it from the client
    pub fn internal_error(err: anyhow::Error) -> Self {
        tracing::error!("Internal error: {:#}", err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<NewsServiceError> for ApiError {
    fn from(err: NewsServiceError) -> Self {
        match err {
            NewsServiceError::ValidationError(msg) | NewsServiceError::DomainRule(msg) => {
                ApiError::bad_request(msg)
            }
            NewsServiceError::NotFound(_) => ApiError::not_found("news not found"),
            NewsServiceError::InternalError(e) => ApiError::internal_error(e),
        }
    }
}

impl From<TopicServiceError> for ApiError {
    fn from(err: TopicServiceError) -> Self {
        match err {
            TopicServiceError::ValidationError(msg) => ApiError::bad_request(msg),
            TopicServiceError::NotFound(_) => ApiError::not_found("topic not found"),
            TopicServiceError::Conflict(msg) => ApiError::conflict(msg),
            TopicServiceError::InternalError(e) => ApiError::internal_error(e),
        }
    }
}

/// Malformed or mistyped request bodies
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}
