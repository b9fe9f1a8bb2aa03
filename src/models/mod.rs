//! Data models
//!
//! This module contains the data structures shared by the newsroom service.
//! Models represent:
//! - Database entities (News, Topic)
//! - Service inputs decoded from request bodies
//! - Pagination and list filters

mod news;
mod pagination;
mod topic;

pub use news::{
    CreateNewsInput, News, NewsFilter, NewsStatus, TopicRef, UpdateNewsInput,
    UpdateNewsStatusInput,
};
pub use pagination::{PagedResult, Pagination};
pub use topic::{CreateTopicInput, Topic, UpdateTopicInput};
