//! Database layer
//!
//! SQLite storage for news and topics:
//! - `pool`: connection pool bootstrap
//! - `migrations`: embedded schema migrations
//! - `repositories`: trait-based data access used by the services
//!
//! # Usage
//!
//! ```ignore
//! use newsroom::config::DatabaseConfig;
//! use newsroom::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, ping, DbPool};
