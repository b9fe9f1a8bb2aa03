//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles CRUD operations for a specific entity.

pub mod news;
pub mod topic;

pub use news::{NewsRepository, NewsTransaction, SqlxNewsRepository};
pub use topic::{SqlxTopicRepository, TopicRepository};
