//! Input validation shared by the news and topic services

use crate::config::ValidationConfig;

/// A rejected field, carrying the message returned to the client
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct FieldError(pub String);

/// Field validator configured from the `validation` config section
#[derive(Debug, Clone)]
pub struct Validator {
    title_min_length: usize,
    title_max_length: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&ValidationConfig::default())
    }
}

impl Validator {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            title_min_length: config.title_min_length,
            title_max_length: config.title_max_length,
        }
    }

    /// Reject blank values
    pub fn require(&self, field: &str, value: &str) -> Result<(), FieldError> {
        if value.trim().is_empty() {
            return Err(FieldError(format!("{} is required", field)));
        }
        Ok(())
    }

    /// Check the trimmed title length in characters
    pub fn title_length(&self, title: &str) -> Result<(), FieldError> {
        let len = title.trim().chars().count();
        if len < self.title_min_length || len > self.title_max_length {
            return Err(FieldError(format!(
                "title must be between {} and {} characters",
                self.title_min_length, self.title_max_length
            )));
        }
        Ok(())
    }

    /// `require` followed by `title_length`
    pub fn title(&self, title: &str) -> Result<(), FieldError> {
        self.require("title", title)?;
        self.title_length(title)
    }
}
