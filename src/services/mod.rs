//! Services layer - Business logic
//!
//! This module contains the business logic of the newsroom service.
//! Services are responsible for:
//! - Implementing the news lifecycle and topic rules
//! - Coordinating repository calls and transactions
//! - Handling validation and error cases

pub mod news;
pub mod topic;
pub mod validation;

pub use news::{NewsService, NewsServiceError};
pub use topic::{generate_slug, TopicService, TopicServiceError};
pub use validation::{FieldError, Validator};

use uuid::Uuid;

/// Parse an external UUID; malformed input is treated like an unknown one
pub(crate) fn parse_uuid(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value.trim()).ok()
}

/// Whether an error chain contains a SQLite UNIQUE constraint failure
pub(crate) fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| match cause.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
        _ => false,
    })
}
