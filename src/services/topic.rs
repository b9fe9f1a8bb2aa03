//! Topic service
//!
//! Implements business logic for topic management:
//! - Paginated listing and lookup by UUID
//! - Creation with slug derivation and uniqueness checks
//! - Title updates and hard deletion

use super::validation::{FieldError, Validator};
use super::{is_unique_violation, parse_uuid};
use crate::db::repositories::TopicRepository;
use crate::models::{CreateTopicInput, PagedResult, Pagination, Topic, UpdateTopicInput};
use anyhow::Context;
use std::sync::Arc;

/// Error types for topic service operations
#[derive(Debug, thiserror::Error)]
pub enum TopicServiceError {
    /// Topic not found
    #[error("Topic not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("{0}")]
    ValidationError(String),

    /// Title or value already taken
    #[error("{0}")]
    Conflict(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<FieldError> for TopicServiceError {
    fn from(err: FieldError) -> Self {
        TopicServiceError::ValidationError(err.0)
    }
}

const TOPIC_CONFLICT: &str = "topic with this title or value already exists";

/// Topic service
pub struct TopicService {
    repo: Arc<dyn TopicRepository>,
    validator: Arc<Validator>,
}

impl TopicService {
    /// Create a new topic service
    ///
    /// # Arguments
    /// * `repo` - Topic repository for database operations
    /// * `validator` - Shared field validator
    pub fn new(repo: Arc<dyn TopicRepository>, validator: Arc<Validator>) -> Self {
        Self { repo, validator }
    }

    /// List one page of topics, newest first
    pub async fn list(
        &self,
        pagination: Pagination,
    ) -> Result<PagedResult<Topic>, TopicServiceError> {
        let items = self
            .repo
            .list(pagination.offset(), pagination.limit())
            .await
            .context("Failed to list topics")?;
        let total = self.repo.count().await.context("Failed to count topics")?;

        Ok(PagedResult::new(items, total, pagination))
    }

    /// Get a topic by its external UUID
    ///
    /// # Errors
    /// - `NotFound` if the UUID is malformed or unknown
    pub async fn get_by_uuid(&self, uuid: &str) -> Result<Topic, TopicServiceError> {
        let not_found = || TopicServiceError::NotFound(uuid.to_string());
        let parsed = parse_uuid(uuid).ok_or_else(not_found)?;

        self.repo
            .get_by_uuid(&parsed)
            .await
            .context("Failed to get topic by UUID")?
            .ok_or_else(not_found)
    }

    /// Create a topic
    ///
    /// The value defaults to `generate_slug(title)` when left blank.
    ///
    /// # Errors
    /// - `ValidationError` if the title is blank or out of bounds
    /// - `Conflict` if the title or value is already used
    pub async fn create(&self, input: CreateTopicInput) -> Result<Topic, TopicServiceError> {
        let title = input.title.trim();
        self.validator.title(title)?;

        let value = match input.value.trim() {
            "" => generate_slug(title),
            supplied => supplied.to_string(),
        };
        if value.is_empty() {
            return Err(TopicServiceError::ValidationError(
                "value is required".to_string(),
            ));
        }

        if self
            .repo
            .find_conflicting(title, &value, None)
            .await
            .context("Failed to check topic uniqueness")?
            .is_some()
        {
            return Err(TopicServiceError::Conflict(TOPIC_CONFLICT.to_string()));
        }

        let topic = Topic::new(title.to_string(), value);
        let created = self.repo.create(&topic).await.map_err(conflict_or_internal)?;

        tracing::info!(uuid = %created.uuid, value = %created.value, "Topic created");
        Ok(created)
    }

    /// Update the title of a topic. A blank title leaves it unchanged.
    ///
    /// # Errors
    /// - `NotFound` if the topic does not exist
    /// - `ValidationError` if the new title is out of bounds
    /// - `Conflict` if another topic already has the title
    pub async fn update_by_uuid(
        &self,
        uuid: &str,
        input: UpdateTopicInput,
    ) -> Result<Topic, TopicServiceError> {
        let topic = self.get_by_uuid(uuid).await?;

        let title = input.title.trim();
        if title.is_empty() || title == topic.title {
            return Ok(topic);
        }
        self.validator.title_length(title)?;

        if self
            .repo
            .find_conflicting(title, &topic.value, Some(topic.id))
            .await
            .context("Failed to check topic uniqueness")?
            .is_some()
        {
            return Err(TopicServiceError::Conflict(TOPIC_CONFLICT.to_string()));
        }

        let updated = self
            .repo
            .update_title(topic.id, title)
            .await
            .map_err(conflict_or_internal)?;

        tracing::info!(uuid = %updated.uuid, "Topic updated");
        Ok(updated)
    }

    /// Delete a topic and its news associations
    ///
    /// # Errors
    /// - `NotFound` if the topic does not exist
    pub async fn delete_by_uuid(&self, uuid: &str) -> Result<(), TopicServiceError> {
        let topic = self.get_by_uuid(uuid).await?;

        self.repo
            .delete(topic.id)
            .await
            .context("Failed to delete topic")?;

        tracing::info!(uuid = %topic.uuid, "Topic deleted");
        Ok(())
    }
}

/// A write that lost a uniqueness race is still a conflict
fn conflict_or_internal(err: anyhow::Error) -> TopicServiceError {
    if is_unique_violation(&err) {
        TopicServiceError::Conflict(TOPIC_CONFLICT.to_string())
    } else {
        TopicServiceError::InternalError(err)
    }
}

/// Generate a URL-friendly slug from a title
///
/// Lowercases ASCII letters, turns spaces, underscores and other ASCII
/// punctuation into single hyphens, keeps non-ASCII characters and trims
/// hyphens from both ends.
pub fn generate_slug(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || !c.is_ascii() {
                c
            } else {
                '-'
            }
        })
        .collect();

    let mut result = String::with_capacity(slug.len());
    let mut prev_hyphen = false;

    for c in slug.chars() {
        if c == '-' {
            if !prev_hyphen && !result.is_empty() {
                result.push(c);
            }
            prev_hyphen = true;
        } else {
            result.push(c);
            prev_hyphen = false;
        }
    }

    result.trim_end_matches('-').to_string()
}
