//! Topic model
//!
//! Topics tag news items. Each topic has a human title and a unique
//! URL-friendly `value` used for filtering news by topic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Topic entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Topic {
    /// Internal identifier
    pub id: i64,
    /// External identifier
    pub uuid: Uuid,
    /// Display title (unique)
    pub title: String,
    /// Slug used in filters (unique)
    pub value: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Topic {
    /// Create a new topic with a fresh UUID.
    ///
    /// The ID will be set to 0 and should be assigned by the database.
    pub fn new(title: String, value: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            uuid: Uuid::new_v4(),
            title,
            value,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a topic
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTopicInput {
    #[serde(default)]
    pub title: String,
    /// Optional slug; derived from the title when blank
    #[serde(default)]
    pub value: String,
}

impl CreateTopicInput {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
        }
    }
}

/// Input for updating a topic; a blank title leaves the topic unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTopicInput {
    #[serde(default)]
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_new() {
        let topic = Topic::new("Rust Programming".to_string(), "rust-programming".to_string());

        assert_eq!(topic.id, 0);
        assert_eq!(topic.title, "Rust Programming");
        assert_eq!(topic.value, "rust-programming");
        assert_eq!(topic.created_at, topic.updated_at);
    }

    #[test]
    fn test_topic_new_generates_distinct_uuids() {
        let a = Topic::new("A".to_string(), "a".to_string());
        let b = Topic::new("B".to_string(), "b".to_string());
        assert_ne!(a.uuid, b.uuid);
    }

    #[test]
    fn test_create_input_value_defaults_to_empty() {
        let input: CreateTopicInput = serde_json::from_str(r#"{"title":"Economy"}"#).unwrap();
        assert_eq!(input.title, "Economy");
        assert!(input.value.is_empty());
    }
}
