//! News model
//!
//! This module provides:
//! - `News` entity with its resolved topics
//! - `NewsStatus` enum and its transition rules
//! - Input types for creating, updating and re-statusing news
//! - `NewsFilter` for list queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Topic;

/// News entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct News {
    /// Internal identifier
    pub id: i64,
    /// External identifier
    pub uuid: Uuid,
    pub title: String,
    pub content: String,
    pub status: NewsStatus,
    /// Associated topics (loaded separately from the news row)
    #[serde(default)]
    pub topics: Vec<Topic>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the news has been soft-deleted
    pub deleted_at: Option<DateTime<Utc>>,
}

impl News {
    /// Create a new news item with a fresh UUID
    pub fn new(title: String, content: String, status: NewsStatus) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            uuid: Uuid::new_v4(),
            title,
            content,
            status,
            topics: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// True once the news went through the delete path
    pub fn is_deleted(&self) -> bool {
        self.status == NewsStatus::Deleted && self.deleted_at.is_some()
    }
}

/// News lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsStatus {
    Published,
    Draft,
    Deleted,
}

impl Default for NewsStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl NewsStatus {
    /// Convert status to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsStatus::Published => "published",
            NewsStatus::Draft => "draft",
            NewsStatus::Deleted => "deleted",
        }
    }

    /// Parse status from its string representation (exact, lowercase)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "published" => Some(NewsStatus::Published),
            "draft" => Some(NewsStatus::Draft),
            "deleted" => Some(NewsStatus::Deleted),
            _ => None,
        }
    }

    /// Statuses a news item may be created with
    pub fn is_initial(&self) -> bool {
        matches!(self, NewsStatus::Published | NewsStatus::Draft)
    }

    /// Whether the lifecycle allows moving from `self` to `target`.
    ///
    /// `draft -> published`, `draft|published -> deleted`; nothing leaves
    /// `deleted` and a status never transitions to itself.
    pub fn can_transition_to(&self, target: NewsStatus) -> bool {
        matches!(
            (self, target),
            (NewsStatus::Draft, NewsStatus::Published)
                | (NewsStatus::Draft, NewsStatus::Deleted)
                | (NewsStatus::Published, NewsStatus::Deleted)
        )
    }
}

impl std::fmt::Display for NewsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reference to a topic by its external UUID
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicRef {
    #[serde(default)]
    pub uuid: String,
}

impl TopicRef {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self { uuid: uuid.into() }
    }
}

/// Input for creating a news item.
///
/// Status is kept as the raw string so that an unknown value surfaces as a
/// validation error from the service rather than a decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNewsInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub topics: Vec<TopicRef>,
}

impl CreateNewsInput {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            status: status.into(),
            topics: Vec::new(),
        }
    }

    /// Set the topic references
    pub fn with_topics(mut self, topics: Vec<TopicRef>) -> Self {
        self.topics = topics;
        self
    }
}

/// Partial update for a draft news item; empty fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNewsInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub topics: Vec<TopicRef>,
}

impl UpdateNewsInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_topics(mut self, topics: Vec<TopicRef>) -> Self {
        self.topics = topics;
        self
    }
}

/// Input for the status endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNewsStatusInput {
    #[serde(default)]
    pub status: String,
}

impl UpdateNewsStatusInput {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

/// Filters for news listings. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsFilter {
    /// Case-insensitive title substring
    pub title: Option<String>,
    /// Topic `value` slug
    pub topic: Option<String>,
    /// Exact status; soft-deleted news only show up when this is `Deleted`
    pub status: Option<NewsStatus>,
}
