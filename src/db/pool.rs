//! Database connection pool
//!
//! Creates the SQLite connection pool used by every repository. File-based
//! databases get their parent directory created on first start.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;

/// Shared pool handle passed to repositories
pub type DbPool = SqlitePool;

/// Build the sqlx connection URL for a configured database path
fn connection_url(url: &str) -> String {
    if url == ":memory:" || url.starts_with("sqlite::memory:") {
        "sqlite::memory:".to_string()
    } else if url.starts_with("sqlite:") {
        if url.contains('?') {
            url.to_string()
        } else {
            format!("{}?mode=rwc", url)
        }
    } else {
        format!("sqlite:{}?mode=rwc", url)
    }
}

/// Create the parent directory of a file-based database
fn ensure_parent_dir(url: &str) -> Result<()> {
    if url == ":memory:" || url.starts_with("sqlite::memory:") {
        return Ok(());
    }

    let path = url.trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or(path);

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }
    }

    Ok(())
}

/// Create a database connection pool based on configuration.
///
/// Foreign keys are enabled on every connection so that association rows
/// cascade when a topic or news row is removed.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool> {
    ensure_parent_dir(&config.url)?;

    let pool = SqlitePoolOptions::new()
        .max_connections(20)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys = ON")
                    .execute(conn)
                    .await?;
                Ok(())
            })
        })
        .connect(&connection_url(&config.url))
        .await
        .with_context(|| format!("Failed to connect to SQLite database: {}", config.url))?;

    Ok(pool)
}

/// Create a SQLite in-memory database pool for testing
pub async fn create_test_pool() -> Result<DbPool> {
    let config = DatabaseConfig {
        url: ":memory:".to_string(),
    };
    create_pool(&config).await
}

/// Check if the database connection is healthy
pub async fn ping(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("Database ping failed")?;
    Ok(())
}
