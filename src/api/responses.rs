//! Shared API response types
//!
//! Every successful response uses the `{code, message, data?, meta?}`
//! envelope; list endpoints attach pagination metadata.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::{News, PagedResult, Topic};

// ============================================================================
// Envelope
// ============================================================================

/// Success envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T> ApiResponse<T> {
    /// 200 with data
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::OK, message, Some(data))
    }

    /// 201 with data
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, Some(data))
    }

    fn with_status(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
            data,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl ApiResponse<()> {
    /// 200 without data
    pub fn message(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, message, None)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

// ============================================================================
// Pagination metadata
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub pagination: MetaPage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaPage {
    pub total: i64,
    pub per_page: u32,
    pub current_page: u32,
    pub last_page: i64,
    /// 1-based index of the first item on the page
    pub from: i64,
    /// 1-based index of the last item on the page
    pub to: i64,
}

impl Meta {
    pub fn from_page<T>(page: &PagedResult<T>) -> Self {
        let offset = page.pagination.offset();
        Self {
            pagination: MetaPage {
                total: page.total,
                per_page: page.pagination.per_page,
                current_page: page.pagination.page,
                last_page: page.last_page(),
                from: offset + 1,
                to: offset + page.items.len() as i64,
            },
        }
    }
}

// ============================================================================
// Entity responses
// ============================================================================

/// Topic as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicResponse {
    pub id: i64,
    pub uuid: String,
    pub title: String,
    pub value: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Topic> for TopicResponse {
    fn from(topic: Topic) -> Self {
        Self {
            id: topic.id,
            uuid: topic.uuid.to_string(),
            title: topic.title,
            value: topic.value,
            created_at: topic.created_at.to_rfc3339(),
            updated_at: topic.updated_at.to_rfc3339(),
        }
    }
}

/// News with its topics as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsResponse {
    pub id: i64,
    pub uuid: String,
    pub title: String,
    pub content: String,
    pub status: String,
    pub topics: Vec<TopicResponse>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

impl From<News> for NewsResponse {
    fn from(news: News) -> Self {
        Self {
            id: news.id,
            uuid: news.uuid.to_string(),
            title: news.title,
            content: news.content,
            status: news.status.to_string(),
            topics: news.topics.into_iter().map(Into::into).collect(),
            created_at: news.created_at.to_rfc3339(),
            updated_at: news.updated_at.to_rfc3339(),
            deleted_at: news.deleted_at.map(|dt| dt.to_rfc3339()),
        }
    }
}
