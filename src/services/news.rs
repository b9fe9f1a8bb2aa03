//! News service
//!
//! Implements the news lifecycle:
//! - Filtered, paginated listing with resolved topics
//! - Creation and draft edits inside a single transaction
//! - Status transitions (`draft -> published`, `draft|published -> deleted`)
//! - Soft deletion through the status path
//!
//! Status rules live in `NewsStatus::can_transition_to`; this service adds
//! the error reporting around them.

use super::parse_uuid;
use super::validation::{FieldError, Validator};
use crate::db::repositories::{NewsRepository, NewsTransaction};
use crate::models::{
    CreateNewsInput, News, NewsFilter, NewsStatus, PagedResult, Pagination, Topic, TopicRef,
    UpdateNewsInput, UpdateNewsStatusInput,
};
use anyhow::Context;
use std::sync::Arc;

/// Error types for news service operations
#[derive(Debug, thiserror::Error)]
pub enum NewsServiceError {
    /// Malformed or missing input
    #[error("{0}")]
    ValidationError(String),

    /// News not found
    #[error("News not found: {0}")]
    NotFound(String),

    /// The request is well-formed but the lifecycle forbids it
    #[error("{0}")]
    DomainRule(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<FieldError> for NewsServiceError {
    fn from(err: FieldError) -> Self {
        NewsServiceError::ValidationError(err.0)
    }
}

impl NewsServiceError {
    fn invalid_status() -> Self {
        NewsServiceError::ValidationError("invalid status".to_string())
    }

    fn topic_not_found() -> Self {
        NewsServiceError::ValidationError("topic entity not found".to_string())
    }
}

/// News service
pub struct NewsService {
    repo: Arc<dyn NewsRepository>,
    validator: Arc<Validator>,
}

impl NewsService {
    /// Create a new news service
    pub fn new(repo: Arc<dyn NewsRepository>, validator: Arc<Validator>) -> Self {
        Self { repo, validator }
    }

    /// Build a list filter from raw query values. Blank values are ignored.
    ///
    /// # Errors
    /// - `ValidationError` if `status` is not a known status
    pub fn build_filter(
        title: Option<&str>,
        topic: Option<&str>,
        status: Option<&str>,
    ) -> Result<NewsFilter, NewsServiceError> {
        let non_blank = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let status = match non_blank(status) {
            Some(s) => Some(NewsStatus::parse(&s).ok_or_else(NewsServiceError::invalid_status)?),
            None => None,
        };

        Ok(NewsFilter {
            title: non_blank(title),
            topic: non_blank(topic),
            status,
        })
    }

    /// List one page of news matching the filter, newest first
    pub async fn list(
        &self,
        pagination: Pagination,
        filter: &NewsFilter,
    ) -> Result<PagedResult<News>, NewsServiceError> {
        let mut items = self
            .repo
            .list(filter, pagination.offset(), pagination.limit())
            .await
            .context("Failed to list news")?;
        let total = self
            .repo
            .count(filter)
            .await
            .context("Failed to count news")?;

        for news in &mut items {
            news.topics = self
                .repo
                .get_topics(news.id)
                .await
                .context("Failed to load news topics")?;
        }

        Ok(PagedResult::new(items, total, pagination))
    }

    /// Get a news item with its topics
    ///
    /// # Errors
    /// - `NotFound` if the UUID is malformed or unknown
    pub async fn get_by_uuid(&self, uuid: &str) -> Result<News, NewsServiceError> {
        let mut news = self.find(uuid).await?;
        news.topics = self
            .repo
            .get_topics(news.id)
            .await
            .context("Failed to load news topics")?;
        Ok(news)
    }

    /// Create a news item and link its topics
    ///
    /// # Errors
    /// - `ValidationError` for a blank title or content, a status other than
    ///   `published`/`draft`, or a topic UUID that does not resolve
    pub async fn create(&self, input: CreateNewsInput) -> Result<News, NewsServiceError> {
        let title = input.title.trim();
        self.validator.title(title)?;
        self.validator.require("content", &input.content)?;

        let status = NewsStatus::parse(input.status.trim())
            .filter(NewsStatus::is_initial)
            .ok_or_else(NewsServiceError::invalid_status)?;

        let draft = News::new(title.to_string(), input.content.clone(), status);

        let mut tx = self.repo.begin().await?;
        let result = create_in_tx(tx.as_mut(), &draft, &input.topics).await;
        let news = finish(tx, result).await?;

        tracing::info!(uuid = %news.uuid, status = %news.status, "News created");
        Ok(news)
    }

    /// Edit a draft. Empty fields are left untouched; a non-empty topic list
    /// replaces the current associations.
    ///
    /// # Errors
    /// - `NotFound` if the news does not exist
    /// - `DomainRule` if the news is not a draft
    /// - `ValidationError` for a bad title, a status other than `published`,
    ///   or an unresolvable topic
    pub async fn update_by_uuid(
        &self,
        uuid: &str,
        input: UpdateNewsInput,
    ) -> Result<News, NewsServiceError> {
        let mut news = self.find(uuid).await?;
        if news.status != NewsStatus::Draft {
            return Err(not_draft());
        }

        let title = input.title.trim();
        if !title.is_empty() {
            self.validator.title_length(title)?;
            news.title = title.to_string();
        }
        if !input.content.trim().is_empty() {
            news.content = input.content.clone();
        }
        if !input.status.trim().is_empty() {
            match NewsStatus::parse(input.status.trim()) {
                Some(NewsStatus::Published) => news.status = NewsStatus::Published,
                _ => return Err(NewsServiceError::invalid_status()),
            }
        }

        let mut tx = self.repo.begin().await?;
        let result = update_in_tx(tx.as_mut(), &news, &input.topics).await;
        finish(tx, result).await?;

        tracing::info!(uuid = %news.uuid, status = %news.status, "News updated");
        self.reload(news.id, uuid).await
    }

    /// Soft-delete a news item
    ///
    /// # Errors
    /// - `NotFound` if the news does not exist
    /// - `DomainRule("news already deleted")` on a second delete
    pub async fn delete_by_uuid(&self, uuid: &str) -> Result<News, NewsServiceError> {
        let news = self.find(uuid).await?;
        if news.is_deleted() {
            return Err(NewsServiceError::DomainRule(
                "news already deleted".to_string(),
            ));
        }
        self.transition(news, NewsStatus::Deleted).await
    }

    /// Move a news item to `published` or `deleted`
    ///
    /// # Errors
    /// - `ValidationError("invalid status")` for any other target
    /// - `NotFound` if the news does not exist
    /// - `DomainRule` if the lifecycle forbids the move
    pub async fn update_status(
        &self,
        uuid: &str,
        input: UpdateNewsStatusInput,
    ) -> Result<News, NewsServiceError> {
        let target = match NewsStatus::parse(input.status.trim()) {
            Some(status @ (NewsStatus::Published | NewsStatus::Deleted)) => status,
            _ => return Err(NewsServiceError::invalid_status()),
        };

        let news = self.find(uuid).await?;
        self.transition(news, target).await
    }

    async fn transition(
        &self,
        news: News,
        target: NewsStatus,
    ) -> Result<News, NewsServiceError> {
        check_transition(news.status, target)?;

        let updated = self
            .repo
            .update_status(news.id, news.status, target)
            .await
            .context("Failed to update news status")?;

        let mut updated = match updated {
            Some(updated) => updated,
            None => return Err(self.stale_transition(&news, target).await),
        };
        updated.topics = self
            .repo
            .get_topics(updated.id)
            .await
            .context("Failed to load news topics")?;

        tracing::info!(uuid = %updated.uuid, from = %news.status, to = %target, "News status changed");
        Ok(updated)
    }

    /// Explain a status write that lost to a concurrent change
    async fn stale_transition(&self, news: &News, target: NewsStatus) -> NewsServiceError {
        tracing::warn!(uuid = %news.uuid, expected = %news.status, "News status changed concurrently");

        let current = match self.repo.get_by_id(news.id).await {
            Ok(Some(current)) => current,
            Ok(None) => return NewsServiceError::NotFound(news.uuid.to_string()),
            Err(err) => return NewsServiceError::InternalError(err),
        };

        match check_transition(current.status, target) {
            Err(err) => err,
            Ok(()) => NewsServiceError::DomainRule(format!(
                "cannot change status from {} to {}",
                news.status, target
            )),
        }
    }

    async fn find(&self, uuid: &str) -> Result<News, NewsServiceError> {
        let not_found = || NewsServiceError::NotFound(uuid.to_string());
        let parsed = parse_uuid(uuid).ok_or_else(not_found)?;

        self.repo
            .get_by_uuid(&parsed)
            .await
            .context("Failed to get news by UUID")?
            .ok_or_else(not_found)
    }

    async fn reload(&self, id: i64, uuid: &str) -> Result<News, NewsServiceError> {
        let mut news = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to reload news")?
            .ok_or_else(|| NewsServiceError::NotFound(uuid.to_string()))?;
        news.topics = self
            .repo
            .get_topics(id)
            .await
            .context("Failed to load news topics")?;
        Ok(news)
    }
}

/// Lifecycle check with the error reported for each forbidden move
fn check_transition(current: NewsStatus, target: NewsStatus) -> Result<(), NewsServiceError> {
    if current == NewsStatus::Deleted {
        return Err(NewsServiceError::DomainRule(
            "news already deleted".to_string(),
        ));
    }
    if current == target {
        return Err(NewsServiceError::DomainRule(
            "news is already in the desired status".to_string(),
        ));
    }
    if !current.can_transition_to(target) {
        return Err(NewsServiceError::DomainRule(format!(
            "cannot change status from {} to {}",
            current, target
        )));
    }
    Ok(())
}

fn not_draft() -> NewsServiceError {
    NewsServiceError::DomainRule("news is not in draft status".to_string())
}

/// Commit on success, roll back on error
async fn finish<T>(
    mut tx: Box<dyn NewsTransaction>,
    result: Result<T, NewsServiceError>,
) -> Result<T, NewsServiceError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!("Failed to roll back news transaction: {}", rollback_err);
            }
            Err(err)
        }
    }
}

async fn create_in_tx(
    tx: &mut dyn NewsTransaction,
    draft: &News,
    refs: &[TopicRef],
) -> Result<News, NewsServiceError> {
    let topics = resolve_topics(tx, refs).await?;
    let mut news = tx.insert_news(draft).await?;

    let topic_ids: Vec<i64> = topics.iter().map(|t| t.id).collect();
    tx.replace_topics(news.id, &topic_ids).await?;

    news.topics = topics;
    Ok(news)
}

async fn update_in_tx(
    tx: &mut dyn NewsTransaction,
    news: &News,
    refs: &[TopicRef],
) -> Result<(), NewsServiceError> {
    // The draft check above ran outside the transaction
    if !tx.update_news(news, NewsStatus::Draft).await? {
        return Err(not_draft());
    }

    if !refs.is_empty() {
        let topics = resolve_topics(tx, refs).await?;
        let topic_ids: Vec<i64> = topics.iter().map(|t| t.id).collect();
        tx.replace_topics(news.id, &topic_ids).await?;
    }

    Ok(())
}

/// Resolve topic references in order, dropping repeats
async fn resolve_topics(
    tx: &mut dyn NewsTransaction,
    refs: &[TopicRef],
) -> Result<Vec<Topic>, NewsServiceError> {
    let mut topics: Vec<Topic> = Vec::with_capacity(refs.len());

    for topic_ref in refs {
        let uuid = parse_uuid(&topic_ref.uuid).ok_or_else(NewsServiceError::topic_not_found)?;
        let topic = tx
            .find_topic_by_uuid(&uuid)
            .await?
            .ok_or_else(NewsServiceError::topic_not_found)?;

        if !topics.iter().any(|t| t.id == topic.id) {
            topics.push(topic);
        }
    }

    Ok(topics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxNewsRepository, SqlxTopicRepository, TopicRepository};
    use crate::db::{create_test_pool, migrations, DbPool};
    use proptest::prelude::*;
    use sqlx::Row;

    async fn setup_test_service() -> (DbPool, NewsService) {
        let pool = create_test_pool()
            .await
            .expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let repo = SqlxNewsRepository::boxed(pool.clone());
        let service = NewsService::new(repo, Arc::new(Validator::default()));

        (pool, service)
    }

    async fn create_topic(pool: &DbPool, title: &str, value: &str) -> Topic {
        SqlxTopicRepository::new(pool.clone())
            .create(&Topic::new(title.to_string(), value.to_string()))
            .await
            .expect("Failed to create topic")
    }

    async fn count_news_rows(pool: &DbPool) -> i64 {
        sqlx::query("SELECT COUNT(*) as count FROM news")
            .fetch_one(pool)
            .await
            .unwrap()
            .get("count")
    }

    fn topic_refs(topics: &[&Topic]) -> Vec<TopicRef> {
        topics.iter().map(|t| TopicRef::new(t.uuid.to_string())).collect()
    }

    fn topic_uuids(topics: &[Topic]) -> Vec<uuid::Uuid> {
        topics.iter().map(|t| t.uuid).collect()
    }

    async fn create_draft(service: &NewsService, title: &str) -> News {
        service
            .create(CreateNewsInput::new(title, "Some content", "draft"))
            .await
            .expect("create should succeed")
    }

    // ========================================================================
    // Create
    // ========================================================================

    #[tokio::test]
    async fn test_create_with_topics() {
        let (pool, service) = setup_test_service().await;
        let economy = create_topic(&pool, "Economy", "economy").await;
        let world = create_topic(&pool, "World", "world").await;

        let news = service
            .create(
                CreateNewsInput::new("Markets rally", "Stocks rose", "published")
                    .with_topics(topic_refs(&[&economy, &world])),
            )
            .await
            .expect("create should succeed");

        assert_eq!(news.status, NewsStatus::Published);
        assert_eq!(topic_uuids(&news.topics), vec![economy.uuid, world.uuid]);

        let fetched = service.get_by_uuid(&news.uuid.to_string()).await.unwrap();
        assert_eq!(fetched.title, "Markets rally");
        assert_eq!(fetched.topics.len(), 2);
    }

    #[tokio::test]
    async fn test_create_unknown_topic_persists_nothing() {
        let (pool, service) = setup_test_service().await;
        let economy = create_topic(&pool, "Economy", "economy").await;

        let mut refs = topic_refs(&[&economy]);
        refs.push(TopicRef::new(uuid::Uuid::new_v4().to_string()));

        let result = service
            .create(CreateNewsInput::new("Markets rally", "Stocks rose", "draft").with_topics(refs))
            .await;

        match result {
            Err(NewsServiceError::ValidationError(msg)) => {
                assert_eq!(msg, "topic entity not found")
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(count_news_rows(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_create_malformed_topic_uuid() {
        let (pool, service) = setup_test_service().await;

        let result = service
            .create(
                CreateNewsInput::new("Markets rally", "Stocks rose", "draft")
                    .with_topics(vec![TopicRef::new("nope")]),
            )
            .await;

        assert!(matches!(result, Err(NewsServiceError::ValidationError(_))));
        assert_eq!(count_news_rows(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let (_pool, service) = setup_test_service().await;

        let cases = [
            CreateNewsInput::new("", "content", "draft"),
            CreateNewsInput::new("Valid title", "  ", "draft"),
            CreateNewsInput::new("Valid title", "content", "deleted"),
            CreateNewsInput::new("Valid title", "content", "archived"),
            CreateNewsInput::new("Valid title", "content", ""),
        ];

        for input in cases {
            let result = service.create(input).await;
            assert!(matches!(result, Err(NewsServiceError::ValidationError(_))));
        }
    }

    #[tokio::test]
    async fn test_create_repeated_topic_links_once() {
        let (pool, service) = setup_test_service().await;
        let economy = create_topic(&pool, "Economy", "economy").await;

        let news = service
            .create(
                CreateNewsInput::new("Markets rally", "Stocks rose", "draft")
                    .with_topics(topic_refs(&[&economy, &economy])),
            )
            .await
            .unwrap();

        assert_eq!(news.topics.len(), 1);
    }

    // ========================================================================
    // Read
    // ========================================================================

    #[tokio::test]
    async fn test_get_by_uuid_not_found() {
        let (_pool, service) = setup_test_service().await;

        let missing = service.get_by_uuid(&uuid::Uuid::new_v4().to_string()).await;
        assert!(matches!(missing, Err(NewsServiceError::NotFound(_))));

        let malformed = service.get_by_uuid("123").await;
        assert!(matches!(malformed, Err(NewsServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_filters() {
        let (pool, service) = setup_test_service().await;
        let sports = create_topic(&pool, "Sports", "sports").await;

        service
            .create(
                CreateNewsInput::new("Cup final", "Report", "published")
                    .with_topics(topic_refs(&[&sports])),
            )
            .await
            .unwrap();
        create_draft(&service, "Budget draft").await;
        create_draft(&service, "Another draft").await;

        let drafts = NewsService::build_filter(None, None, Some("draft")).unwrap();
        let page = service.list(Pagination::default(), &drafts).await.unwrap();
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|n| n.status == NewsStatus::Draft));

        let by_topic = NewsService::build_filter(None, Some("sports"), None).unwrap();
        let page = service.list(Pagination::default(), &by_topic).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "Cup final");
        assert_eq!(page.items[0].topics[0].value, "sports");
    }

    #[tokio::test]
    async fn test_list_hides_deleted_unless_requested() {
        let (_pool, service) = setup_test_service().await;
        create_draft(&service, "Visible").await;
        let gone = create_draft(&service, "Gone").await;
        service.delete_by_uuid(&gone.uuid.to_string()).await.unwrap();

        let all = service
            .list(Pagination::default(), &NewsFilter::default())
            .await
            .unwrap();
        assert_eq!(all.total, 1);
        assert_eq!(all.items[0].title, "Visible");

        let deleted = NewsService::build_filter(None, None, Some("deleted")).unwrap();
        let page = service.list(Pagination::default(), &deleted).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].uuid, gone.uuid);
    }

    #[test]
    fn test_build_filter() {
        let filter = NewsService::build_filter(Some(" market "), Some(""), None).unwrap();
        assert_eq!(filter.title.as_deref(), Some("market"));
        assert!(filter.topic.is_none());
        assert!(filter.status.is_none());

        let invalid = NewsService::build_filter(None, None, Some("archived"));
        assert!(matches!(invalid, Err(NewsServiceError::ValidationError(_))));
    }

    // ========================================================================
    // Update
    // ========================================================================

    #[tokio::test]
    async fn test_update_draft_fields_and_topics() {
        let (pool, service) = setup_test_service().await;
        let economy = create_topic(&pool, "Economy", "economy").await;
        let world = create_topic(&pool, "World", "world").await;
        let news = service
            .create(
                CreateNewsInput::new("Old title", "Old content", "draft")
                    .with_topics(topic_refs(&[&economy])),
            )
            .await
            .unwrap();

        let updated = service
            .update_by_uuid(
                &news.uuid.to_string(),
                UpdateNewsInput::new()
                    .with_title("New title")
                    .with_topics(topic_refs(&[&world])),
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "New title");
        assert_eq!(updated.content, "Old content");
        assert_eq!(updated.status, NewsStatus::Draft);
        assert_eq!(topic_uuids(&updated.topics), vec![world.uuid]);
    }

    #[tokio::test]
    async fn test_update_empty_topics_keeps_associations() {
        let (pool, service) = setup_test_service().await;
        let economy = create_topic(&pool, "Economy", "economy").await;
        let news = service
            .create(
                CreateNewsInput::new("Old title", "Old content", "draft")
                    .with_topics(topic_refs(&[&economy])),
            )
            .await
            .unwrap();

        let updated = service
            .update_by_uuid(
                &news.uuid.to_string(),
                UpdateNewsInput::new().with_content("New content"),
            )
            .await
            .unwrap();

        assert_eq!(updated.content, "New content");
        assert_eq!(topic_uuids(&updated.topics), vec![economy.uuid]);
    }

    #[tokio::test]
    async fn test_update_can_publish() {
        let (_pool, service) = setup_test_service().await;
        let news = create_draft(&service, "Draft title").await;

        let updated = service
            .update_by_uuid(
                &news.uuid.to_string(),
                UpdateNewsInput::new().with_status("published"),
            )
            .await
            .unwrap();

        assert_eq!(updated.status, NewsStatus::Published);
    }

    #[tokio::test]
    async fn test_update_rejects_other_statuses() {
        let (_pool, service) = setup_test_service().await;
        let news = create_draft(&service, "Draft title").await;

        for status in ["deleted", "draft", "bogus"] {
            let result = service
                .update_by_uuid(
                    &news.uuid.to_string(),
                    UpdateNewsInput::new().with_status(status),
                )
                .await;
            assert!(matches!(result, Err(NewsServiceError::ValidationError(_))));
        }
    }

    #[tokio::test]
    async fn test_update_unknown_topic_rolls_back() {
        let (_pool, service) = setup_test_service().await;
        let news = create_draft(&service, "Draft title").await;

        let result = service
            .update_by_uuid(
                &news.uuid.to_string(),
                UpdateNewsInput::new()
                    .with_title("Changed title")
                    .with_topics(vec![TopicRef::new(uuid::Uuid::new_v4().to_string())]),
            )
            .await;
        assert!(matches!(result, Err(NewsServiceError::ValidationError(_))));

        let unchanged = service.get_by_uuid(&news.uuid.to_string()).await.unwrap();
        assert_eq!(unchanged.title, "Draft title");
    }

    #[tokio::test]
    async fn test_update_published_is_domain_rule() {
        let (_pool, service) = setup_test_service().await;
        let news = service
            .create(CreateNewsInput::new("Live title", "Content", "published"))
            .await
            .unwrap();

        let result = service
            .update_by_uuid(&news.uuid.to_string(), UpdateNewsInput::new().with_title("Nope"))
            .await;

        match result {
            Err(NewsServiceError::DomainRule(msg)) => {
                assert_eq!(msg, "news is not in draft status")
            }
            other => panic!("expected domain rule error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let (_pool, service) = setup_test_service().await;

        let result = service
            .update_by_uuid(&uuid::Uuid::new_v4().to_string(), UpdateNewsInput::new())
            .await;

        assert!(matches!(result, Err(NewsServiceError::NotFound(_))));
    }

    // ========================================================================
    // Status and delete
    // ========================================================================

    #[tokio::test]
    async fn test_status_transitions() {
        let (_pool, service) = setup_test_service().await;
        let news = create_draft(&service, "Draft title").await;
        let uuid = news.uuid.to_string();

        let published = service
            .update_status(&uuid, UpdateNewsStatusInput::new("published"))
            .await
            .unwrap();
        assert_eq!(published.status, NewsStatus::Published);

        let again = service
            .update_status(&uuid, UpdateNewsStatusInput::new("published"))
            .await;
        match again {
            Err(NewsServiceError::DomainRule(msg)) => {
                assert_eq!(msg, "news is already in the desired status")
            }
            other => panic!("expected domain rule error, got {:?}", other),
        }

        let deleted = service
            .update_status(&uuid, UpdateNewsStatusInput::new("deleted"))
            .await
            .unwrap();
        assert_eq!(deleted.status, NewsStatus::Deleted);
        assert!(deleted.deleted_at.is_some());

        let revived = service
            .update_status(&uuid, UpdateNewsStatusInput::new("published"))
            .await;
        assert!(matches!(revived, Err(NewsServiceError::DomainRule(_))));
    }

    #[tokio::test]
    async fn test_status_rejects_unknown_targets() {
        let (_pool, service) = setup_test_service().await;
        let news = create_draft(&service, "Draft title").await;

        for status in ["draft", "", "archived"] {
            let result = service
                .update_status(&news.uuid.to_string(), UpdateNewsStatusInput::new(status))
                .await;
            assert!(matches!(result, Err(NewsServiceError::ValidationError(_))));
        }
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (_pool, service) = setup_test_service().await;
        let news = service
            .create(CreateNewsInput::new("Live title", "Content", "published"))
            .await
            .unwrap();
        let uuid = news.uuid.to_string();

        let deleted = service.delete_by_uuid(&uuid).await.unwrap();
        assert_eq!(deleted.status, NewsStatus::Deleted);
        assert!(deleted.deleted_at.is_some());

        match service.delete_by_uuid(&uuid).await {
            Err(NewsServiceError::DomainRule(msg)) => assert_eq!(msg, "news already deleted"),
            other => panic!("expected domain rule error, got {:?}", other),
        }

        // Soft-deleted rows stay addressable
        let fetched = service.get_by_uuid(&uuid).await.unwrap();
        assert_eq!(fetched.status, NewsStatus::Deleted);
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let (_pool, service) = setup_test_service().await;

        let result = service.delete_by_uuid(&uuid::Uuid::new_v4().to_string()).await;
        assert!(matches!(result, Err(NewsServiceError::NotFound(_))));
    }

    // ========================================================================
    // Concurrent status changes
    // ========================================================================

    /// Repository that commits a competing write right before the service
    /// performs its own, as a parallel request would.
    struct InterleavedRepository {
        inner: Arc<dyn NewsRepository>,
        pool: DbPool,
        competing_sql: &'static str,
    }

    impl InterleavedRepository {
        async fn run_competing_write(&self) -> anyhow::Result<()> {
            sqlx::query(self.competing_sql).execute(&self.pool).await?;
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl NewsRepository for InterleavedRepository {
        async fn get_by_uuid(&self, uuid: &uuid::Uuid) -> anyhow::Result<Option<News>> {
            self.inner.get_by_uuid(uuid).await
        }

        async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<News>> {
            self.inner.get_by_id(id).await
        }

        async fn list(
            &self,
            filter: &NewsFilter,
            offset: i64,
            limit: i64,
        ) -> anyhow::Result<Vec<News>> {
            self.inner.list(filter, offset, limit).await
        }

        async fn count(&self, filter: &NewsFilter) -> anyhow::Result<i64> {
            self.inner.count(filter).await
        }

        async fn get_topics(&self, news_id: i64) -> anyhow::Result<Vec<Topic>> {
            self.inner.get_topics(news_id).await
        }

        async fn update_status(
            &self,
            id: i64,
            from: NewsStatus,
            to: NewsStatus,
        ) -> anyhow::Result<Option<News>> {
            self.run_competing_write().await?;
            self.inner.update_status(id, from, to).await
        }

        async fn begin(&self) -> anyhow::Result<Box<dyn NewsTransaction>> {
            self.run_competing_write().await?;
            self.inner.begin().await
        }
    }

    const DELETE_ALL: &str =
        "UPDATE news SET status = 'deleted', deleted_at = CURRENT_TIMESTAMP";
    const PUBLISH_ALL: &str = "UPDATE news SET status = 'published'";

    async fn interleaved_service(competing_sql: &'static str) -> (NewsService, News) {
        let (pool, service) = setup_test_service().await;
        let news = create_draft(&service, "Draft title").await;

        let repo = Arc::new(InterleavedRepository {
            inner: SqlxNewsRepository::boxed(pool.clone()),
            pool,
            competing_sql,
        });
        (NewsService::new(repo, Arc::new(Validator::default())), news)
    }

    #[tokio::test]
    async fn test_edit_does_not_revive_concurrently_deleted_news() {
        let (service, news) = interleaved_service(DELETE_ALL).await;
        let uuid = news.uuid.to_string();

        let result = service
            .update_by_uuid(&uuid, UpdateNewsInput::new().with_title("Edited"))
            .await;
        match result {
            Err(NewsServiceError::DomainRule(msg)) => {
                assert_eq!(msg, "news is not in draft status")
            }
            other => panic!("expected domain rule error, got {:?}", other),
        }

        let after = service.get_by_uuid(&uuid).await.unwrap();
        assert_eq!(after.status, NewsStatus::Deleted);
        assert!(after.deleted_at.is_some());
        assert_eq!(after.title, "Draft title");
    }

    #[tokio::test]
    async fn test_publish_does_not_revive_concurrently_deleted_news() {
        let (service, news) = interleaved_service(DELETE_ALL).await;
        let uuid = news.uuid.to_string();

        let result = service
            .update_status(&uuid, UpdateNewsStatusInput::new("published"))
            .await;
        match result {
            Err(NewsServiceError::DomainRule(msg)) => assert_eq!(msg, "news already deleted"),
            other => panic!("expected domain rule error, got {:?}", other),
        }

        let after = service.get_by_uuid(&uuid).await.unwrap();
        assert_eq!(after.status, NewsStatus::Deleted);
        assert!(after.deleted_at.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_publish_reports_current_status() {
        let (service, news) = interleaved_service(PUBLISH_ALL).await;
        let uuid = news.uuid.to_string();

        let result = service
            .update_status(&uuid, UpdateNewsStatusInput::new("published"))
            .await;
        match result {
            Err(NewsServiceError::DomainRule(msg)) => {
                assert_eq!(msg, "news is already in the desired status")
            }
            other => panic!("expected domain rule error, got {:?}", other),
        }
    }

    // ========================================================================
    // Property-Based Tests
    // ========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// Any status string outside {published, deleted} is rejected by the
        /// status endpoint before the news is even looked up.
        #[test]
        fn prop_update_status_rejects_non_targets(status in "[a-z]{0,12}") {
            prop_assume!(status != "published" && status != "deleted");

            let rt = tokio::runtime::Runtime::new().unwrap();
            let result: Result<(), TestCaseError> = rt.block_on(async {
                let (_pool, service) = setup_test_service().await;
                let news = create_draft(&service, "Draft title").await;

                let result = service
                    .update_status(&news.uuid.to_string(), UpdateNewsStatusInput::new(status.clone()))
                    .await;
                prop_assert!(matches!(result, Err(NewsServiceError::ValidationError(_))));
                Ok(())
            });
            result?;
        }

        /// Once published, a news item can never be edited.
        #[test]
        fn prop_published_news_rejects_updates(
            title in "[a-zA-Z ]{0,20}",
            content in "[a-zA-Z ]{0,20}",
            status in prop::sample::select(vec!["", "published", "draft", "deleted"]),
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let result: Result<(), TestCaseError> = rt.block_on(async {
                let (_pool, service) = setup_test_service().await;
                let news = service
                    .create(CreateNewsInput::new("Live title", "Content", "published"))
                    .await
                    .unwrap();

                let input = UpdateNewsInput::new()
                    .with_title(title.clone())
                    .with_content(content.clone())
                    .with_status(status);
                let result = service.update_by_uuid(&news.uuid.to_string(), input).await;
                prop_assert!(matches!(result, Err(NewsServiceError::DomainRule(_))));
                Ok(())
            });
            result?;
        }
    }
}
