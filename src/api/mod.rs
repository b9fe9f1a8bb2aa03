//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP API endpoints of the newsroom service.
//! It includes:
//! - News API endpoints
//! - Topic API endpoints
//! - Shared state, error envelope and response types

pub mod common;
pub mod middleware;
pub mod news;
pub mod responses;
pub mod topics;

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use middleware::{ApiError, AppState};

/// Build the `/api/v1` routes
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .route("/", get(server_time))
        .merge(topics::router())
        .merge(news::router())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> anyhow::Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Ok(Router::new()
        .nest("/api/v1", build_api_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// GET /api/v1/ - Liveness check returning the server time
async fn server_time() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
