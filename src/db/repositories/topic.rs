//! Topic repository
//!
//! Database operations for topics.
//!
//! This module provides:
//! - `TopicRepository` trait defining the interface for topic data access
//! - `SqlxTopicRepository` implementing the trait for SQLite

use crate::db::DbPool;
use crate::models::Topic;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

/// Topic repository trait
#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// Insert a topic and return it with its assigned ID
    async fn create(&self, topic: &Topic) -> Result<Topic>;

    /// Get topic by external UUID
    async fn get_by_uuid(&self, uuid: &Uuid) -> Result<Option<Topic>>;

    /// Get topic by internal ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Topic>>;

    /// Get topic by title or value, skipping `exclude_id` when given.
    ///
    /// Used to detect uniqueness conflicts before writing.
    async fn find_conflicting(
        &self,
        title: &str,
        value: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Topic>>;

    /// List one page of topics, newest first
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Topic>>;

    /// Count all topics
    async fn count(&self) -> Result<i64>;

    /// Change the title of a topic and bump `updated_at`
    async fn update_title(&self, id: i64, title: &str) -> Result<Topic>;

    /// Delete a topic; its news associations go with it
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based topic repository implementation
pub struct SqlxTopicRepository {
    pool: DbPool,
}

impl SqlxTopicRepository {
    /// Create a new SQLx topic repository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn TopicRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TopicRepository for SqlxTopicRepository {
    async fn create(&self, topic: &Topic) -> Result<Topic> {
        create_topic_sqlite(&self.pool, topic).await
    }

    async fn get_by_uuid(&self, uuid: &Uuid) -> Result<Option<Topic>> {
        get_topic_by_uuid_sqlite(&self.pool, uuid).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Topic>> {
        get_topic_by_id_sqlite(&self.pool, id).await
    }

    async fn find_conflicting(
        &self,
        title: &str,
        value: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Topic>> {
        find_conflicting_topic_sqlite(&self.pool, title, value, exclude_id).await
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Topic>> {
        list_topics_sqlite(&self.pool, offset, limit).await
    }

    async fn count(&self) -> Result<i64> {
        count_topics_sqlite(&self.pool).await
    }

    async fn update_title(&self, id: i64, title: &str) -> Result<Topic> {
        update_topic_title_sqlite(&self.pool, id, title).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        delete_topic_sqlite(&self.pool, id).await
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

/// Column list shared by every topic SELECT
pub(crate) const TOPIC_COLUMNS: &str = "t.id, t.uuid, t.title, t.value, t.created_at, t.updated_at";

async fn create_topic_sqlite(pool: &SqlitePool, topic: &Topic) -> Result<Topic> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO topics (uuid, title, value, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(topic.uuid.to_string())
    .bind(&topic.title)
    .bind(&topic.value)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create topic")?;

    Ok(Topic {
        id: result.last_insert_rowid(),
        uuid: topic.uuid,
        title: topic.title.clone(),
        value: topic.value.clone(),
        created_at: now,
        updated_at: now,
    })
}

async fn get_topic_by_uuid_sqlite(pool: &SqlitePool, uuid: &Uuid) -> Result<Option<Topic>> {
    let sql = format!("SELECT {} FROM topics t WHERE t.uuid = ?", TOPIC_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(uuid.to_string())
        .fetch_optional(pool)
        .await
        .context("Failed to get topic by UUID")?;

    row.as_ref().map(row_to_topic).transpose()
}

async fn get_topic_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Topic>> {
    let sql = format!("SELECT {} FROM topics t WHERE t.id = ?", TOPIC_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get topic by ID")?;

    row.as_ref().map(row_to_topic).transpose()
}

async fn find_conflicting_topic_sqlite(
    pool: &SqlitePool,
    title: &str,
    value: &str,
    exclude_id: Option<i64>,
) -> Result<Option<Topic>> {
    let sql = format!(
        "SELECT {} FROM topics t WHERE (t.title = ? OR t.value = ?) AND t.id != ? LIMIT 1",
        TOPIC_COLUMNS
    );
    let row = sqlx::query(&sql)
        .bind(title)
        .bind(value)
        .bind(exclude_id.unwrap_or(0))
        .fetch_optional(pool)
        .await
        .context("Failed to look up conflicting topic")?;

    row.as_ref().map(row_to_topic).transpose()
}

async fn list_topics_sqlite(pool: &SqlitePool, offset: i64, limit: i64) -> Result<Vec<Topic>> {
    let sql = format!(
        "SELECT {} FROM topics t ORDER BY t.created_at DESC, t.id DESC LIMIT ? OFFSET ?",
        TOPIC_COLUMNS
    );
    let rows = sqlx::query(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list topics")?;

    rows.iter().map(row_to_topic).collect()
}

async fn count_topics_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM topics")
        .fetch_one(pool)
        .await
        .context("Failed to count topics")?;

    Ok(row.get("count"))
}

async fn update_topic_title_sqlite(pool: &SqlitePool, id: i64, title: &str) -> Result<Topic> {
    sqlx::query("UPDATE topics SET title = ?, updated_at = ? WHERE id = ?")
        .bind(title)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update topic")?;

    get_topic_by_id_sqlite(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Topic not found after update"))
}

async fn delete_topic_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    // news_topics rows are removed by ON DELETE CASCADE
    sqlx::query("DELETE FROM topics WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete topic")?;

    Ok(())
}

/// Map a row selected with `TOPIC_COLUMNS` to a `Topic`
pub(crate) fn row_to_topic(row: &SqliteRow) -> Result<Topic> {
    let uuid: String = row.get("uuid");
    Ok(Topic {
        id: row.get("id"),
        uuid: Uuid::parse_str(&uuid).context("Invalid topic UUID in database")?,
        title: row.get("title"),
        value: row.get("value"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
