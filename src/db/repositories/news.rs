//! News repository
//!
//! Database operations for news items and their topic associations.
//!
//! This module provides:
//! - `NewsRepository` trait for reads and single-statement writes
//! - `NewsTransaction` trait for the multi-statement create/update paths
//! - `SqlxNewsRepository` / `SqlxNewsTransaction` implementing both for SQLite
//!
//! Listing filters are assembled with `sqlx::QueryBuilder` so the same
//! predicate is shared by the page query and the count query.

use super::topic::{row_to_topic, TOPIC_COLUMNS};
use crate::db::DbPool;
use crate::models::{News, NewsFilter, NewsStatus, Topic};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::sync::Arc;
use uuid::Uuid;

/// News repository trait
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Get news by external UUID, including soft-deleted rows.
    ///
    /// Topics are not loaded; see `get_topics`.
    async fn get_by_uuid(&self, uuid: &Uuid) -> Result<Option<News>>;

    /// Get news by internal ID
    async fn get_by_id(&self, id: i64) -> Result<Option<News>>;

    /// List one page of news matching the filter, newest first
    async fn list(&self, filter: &NewsFilter, offset: i64, limit: i64) -> Result<Vec<News>>;

    /// Count news matching the filter
    async fn count(&self, filter: &NewsFilter) -> Result<i64>;

    /// Get the topics associated with a news item
    async fn get_topics(&self, news_id: i64) -> Result<Vec<Topic>>;

    /// Move a news item from `from` to `to`; moving to `Deleted` stamps
    /// `deleted_at`.
    ///
    /// Returns `None` when the row is no longer in `from`.
    async fn update_status(
        &self,
        id: i64,
        from: NewsStatus,
        to: NewsStatus,
    ) -> Result<Option<News>>;

    /// Open a write transaction
    async fn begin(&self) -> Result<Box<dyn NewsTransaction>>;
}

/// Write operations that must succeed or fail together.
///
/// Dropping an unfinished transaction rolls it back.
#[async_trait]
pub trait NewsTransaction: Send {
    /// Resolve a topic by UUID inside the transaction
    async fn find_topic_by_uuid(&mut self, uuid: &Uuid) -> Result<Option<Topic>>;

    /// Insert a news row and return it with its assigned ID
    async fn insert_news(&mut self, news: &News) -> Result<News>;

    /// Write title, content and status of a news row that is still in
    /// `expected` status. Returns `false` when no such row exists.
    async fn update_news(&mut self, news: &News, expected: NewsStatus) -> Result<bool>;

    /// Replace all topic associations of a news item
    async fn replace_topics(&mut self, news_id: i64, topic_ids: &[i64]) -> Result<()>;

    async fn commit(&mut self) -> Result<()>;

    async fn rollback(&mut self) -> Result<()>;
}

/// SQLx-based news repository implementation
pub struct SqlxNewsRepository {
    pool: DbPool,
}

impl SqlxNewsRepository {
    /// Create a new SQLx news repository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn NewsRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl NewsRepository for SqlxNewsRepository {
    async fn get_by_uuid(&self, uuid: &Uuid) -> Result<Option<News>> {
        get_news_by_uuid_sqlite(&self.pool, uuid).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<News>> {
        get_news_by_id_sqlite(&self.pool, id).await
    }

    async fn list(&self, filter: &NewsFilter, offset: i64, limit: i64) -> Result<Vec<News>> {
        list_news_sqlite(&self.pool, filter, offset, limit).await
    }

    async fn count(&self, filter: &NewsFilter) -> Result<i64> {
        count_news_sqlite(&self.pool, filter).await
    }

    async fn get_topics(&self, news_id: i64) -> Result<Vec<Topic>> {
        get_news_topics_sqlite(&self.pool, news_id).await
    }

    async fn update_status(
        &self,
        id: i64,
        from: NewsStatus,
        to: NewsStatus,
    ) -> Result<Option<News>> {
        update_news_status_sqlite(&self.pool, id, from, to).await
    }

    async fn begin(&self) -> Result<Box<dyn NewsTransaction>> {
        let tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;
        Ok(Box::new(SqlxNewsTransaction { tx: Some(tx) }))
    }
}

/// SQLite transaction handle for news writes
pub struct SqlxNewsTransaction {
    tx: Option<Transaction<'static, Sqlite>>,
}

impl SqlxNewsTransaction {
    fn conn(&mut self) -> Result<&mut SqliteConnection> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| anyhow!("Transaction already finished"))
    }
}

#[async_trait]
impl NewsTransaction for SqlxNewsTransaction {
    async fn find_topic_by_uuid(&mut self, uuid: &Uuid) -> Result<Option<Topic>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM topics t WHERE t.uuid = ?", TOPIC_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(uuid.to_string())
            .fetch_optional(&mut *conn)
            .await
            .context("Failed to get topic by UUID")?;

        row.as_ref().map(row_to_topic).transpose()
    }

    async fn insert_news(&mut self, news: &News) -> Result<News> {
        let conn = self.conn()?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO news (uuid, title, content, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(news.uuid.to_string())
        .bind(&news.title)
        .bind(&news.content)
        .bind(news.status.as_str())
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await
        .context("Failed to create news")?;

        Ok(News {
            id: result.last_insert_rowid(),
            uuid: news.uuid,
            title: news.title.clone(),
            content: news.content.clone(),
            status: news.status,
            topics: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    async fn update_news(&mut self, news: &News, expected: NewsStatus) -> Result<bool> {
        let conn = self.conn()?;

        let result = sqlx::query(
            r#"
            UPDATE news
            SET title = ?, content = ?, status = ?, updated_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(&news.title)
        .bind(&news.content)
        .bind(news.status.as_str())
        .bind(Utc::now())
        .bind(news.id)
        .bind(expected.as_str())
        .execute(&mut *conn)
        .await
        .context("Failed to update news")?;

        Ok(result.rows_affected() == 1)
    }

    async fn replace_topics(&mut self, news_id: i64, topic_ids: &[i64]) -> Result<()> {
        let conn = self.conn()?;

        sqlx::query("DELETE FROM news_topics WHERE news_id = ?")
            .bind(news_id)
            .execute(&mut *conn)
            .await
            .context("Failed to clear news topics")?;

        for topic_id in topic_ids {
            // Repeated references collapse onto the composite primary key
            sqlx::query("INSERT OR IGNORE INTO news_topics (news_id, topic_id) VALUES (?, ?)")
                .bind(news_id)
                .bind(topic_id)
                .execute(&mut *conn)
                .await
                .context("Failed to associate topic with news")?;
        }

        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| anyhow!("Transaction already finished"))?;
        tx.commit().await.context("Failed to commit transaction")
    }

    async fn rollback(&mut self) -> Result<()> {
        match self.tx.take() {
            Some(tx) => tx.rollback().await.context("Failed to roll back transaction"),
            None => Ok(()),
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

const NEWS_COLUMNS: &str =
    "n.id, n.uuid, n.title, n.content, n.status, n.created_at, n.updated_at, n.deleted_at";

async fn get_news_by_uuid_sqlite(pool: &SqlitePool, uuid: &Uuid) -> Result<Option<News>> {
    let sql = format!("SELECT {} FROM news n WHERE n.uuid = ?", NEWS_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(uuid.to_string())
        .fetch_optional(pool)
        .await
        .context("Failed to get news by UUID")?;

    row.as_ref().map(row_to_news).transpose()
}

async fn get_news_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<News>> {
    let sql = format!("SELECT {} FROM news n WHERE n.id = ?", NEWS_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get news by ID")?;

    row.as_ref().map(row_to_news).transpose()
}

/// Append the FROM/JOIN/WHERE part shared by list and count
fn push_news_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &NewsFilter) {
    qb.push(" FROM news n");

    if filter.topic.is_some() {
        qb.push(" JOIN news_topics nt ON nt.news_id = n.id JOIN topics t ON t.id = nt.topic_id");
    }

    qb.push(" WHERE 1 = 1");

    if let Some(title) = &filter.title {
        qb.push(" AND LOWER(n.title) LIKE LOWER(");
        qb.push_bind(format!("%{}%", title));
        qb.push(")");
    }

    if let Some(topic) = &filter.topic {
        qb.push(" AND t.value = ");
        qb.push_bind(topic.clone());
    }

    match filter.status {
        Some(status) => {
            qb.push(" AND n.status = ");
            qb.push_bind(status.as_str());
        }
        None => {
            qb.push(" AND n.deleted_at IS NULL");
        }
    }
}

async fn list_news_sqlite(
    pool: &SqlitePool,
    filter: &NewsFilter,
    offset: i64,
    limit: i64,
) -> Result<Vec<News>> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {}", NEWS_COLUMNS));
    push_news_filter(&mut qb, filter);
    qb.push(" ORDER BY n.created_at DESC, n.id DESC LIMIT ");
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);

    let rows = qb
        .build()
        .fetch_all(pool)
        .await
        .context("Failed to list news")?;

    rows.iter().map(row_to_news).collect()
}

async fn count_news_sqlite(pool: &SqlitePool, filter: &NewsFilter) -> Result<i64> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) as count");
    push_news_filter(&mut qb, filter);

    let row = qb
        .build()
        .fetch_one(pool)
        .await
        .context("Failed to count news")?;

    Ok(row.get("count"))
}

async fn get_news_topics_sqlite(pool: &SqlitePool, news_id: i64) -> Result<Vec<Topic>> {
    let sql = format!(
        r#"
        SELECT {}
        FROM topics t
        INNER JOIN news_topics nt ON nt.topic_id = t.id
        WHERE nt.news_id = ?
        ORDER BY t.id
        "#,
        TOPIC_COLUMNS
    );
    let rows = sqlx::query(&sql)
        .bind(news_id)
        .fetch_all(pool)
        .await
        .context("Failed to get news topics")?;

    rows.iter().map(row_to_topic).collect()
}

async fn update_news_status_sqlite(
    pool: &SqlitePool,
    id: i64,
    from: NewsStatus,
    to: NewsStatus,
) -> Result<Option<News>> {
    let now = Utc::now();

    // Guarded on the observed status so a concurrent transition is not overwritten
    let result = if to == NewsStatus::Deleted {
        sqlx::query(
            "UPDATE news SET status = ?, updated_at = ?, deleted_at = ? WHERE id = ? AND status = ?",
        )
        .bind(to.as_str())
        .bind(now)
        .bind(now)
        .bind(id)
        .bind(from.as_str())
        .execute(pool)
        .await
        .context("Failed to update news status")?
    } else {
        sqlx::query("UPDATE news SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
            .bind(to.as_str())
            .bind(now)
            .bind(id)
            .bind(from.as_str())
            .execute(pool)
            .await
            .context("Failed to update news status")?
    };

    if result.rows_affected() != 1 {
        return Ok(None);
    }

    get_news_by_id_sqlite(pool, id)
        .await?
        .ok_or_else(|| anyhow!("News not found after status update"))
        .map(Some)
}

fn row_to_news(row: &SqliteRow) -> Result<News> {
    let uuid: String = row.get("uuid");
    let status: String = row.get("status");

    Ok(News {
        id: row.get("id"),
        uuid: Uuid::parse_str(&uuid).context("Invalid news UUID in database")?,
        title: row.get("title"),
        content: row.get("content"),
        status: NewsStatus::parse(&status)
            .ok_or_else(|| anyhow!("Unknown news status in database: {}", status))?,
        topics: Vec::new(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        deleted_at: row.get("deleted_at"),
    })
}
