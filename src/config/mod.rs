//! Configuration management
//!
//! This module handles loading and parsing configuration for the newsroom API.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Pagination defaults for list endpoints
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Input validation limits
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9000
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path or URL (`:memory:` for an in-memory database)
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/newsroom.db".to_string()
}

/// Pagination configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the request does not specify `per_page`
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,
    /// Upper bound for `per_page`
    #[serde(default = "default_max_per_page")]
    pub max_per_page: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
            max_per_page: default_max_per_page(),
        }
    }
}

fn default_per_page() -> u32 {
    5
}

fn default_max_per_page() -> u32 {
    100
}

/// Validation limits shared by the news and topic services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Minimum title length in characters
    #[serde(default = "default_title_min_length")]
    pub title_min_length: usize,
    /// Maximum title length in characters
    #[serde(default = "default_title_max_length")]
    pub title_max_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            title_min_length: default_title_min_length(),
            title_max_length: default_title_max_length(),
        }
    }
}

fn default_title_min_length() -> usize {
    3
}

fn default_title_max_length() -> usize {
    255
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - NEWSROOM_SERVER_HOST
    /// - NEWSROOM_SERVER_PORT
    /// - NEWSROOM_SERVER_CORS_ORIGIN
    /// - NEWSROOM_DATABASE_URL
    /// - NEWSROOM_PAGINATION_DEFAULT_PER_PAGE
    /// - NEWSROOM_PAGINATION_MAX_PER_PAGE
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject combinations that would make pagination or validation meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.default_per_page == 0 || self.pagination.max_per_page == 0 {
            return Err(ConfigError::ValidationError(
                "pagination sizes must be greater than zero".to_string(),
            ));
        }
        if self.validation.title_min_length > self.validation.title_max_length {
            return Err(ConfigError::ValidationError(format!(
                "title_min_length ({}) exceeds title_max_length ({})",
                self.validation.title_min_length, self.validation.title_max_length
            )));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("NEWSROOM_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("NEWSROOM_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("NEWSROOM_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        if let Ok(url) = std::env::var("NEWSROOM_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(per_page) = std::env::var("NEWSROOM_PAGINATION_DEFAULT_PER_PAGE") {
            if let Ok(per_page) = per_page.parse::<u32>() {
                self.pagination.default_per_page = per_page;
            }
        }
        if let Ok(max) = std::env::var("NEWSROOM_PAGINATION_MAX_PER_PAGE") {
            if let Ok(max) = max.parse::<u32>() {
                self.pagination.max_per_page = max;
            }
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
