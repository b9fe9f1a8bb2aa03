//! Common API utilities and shared types
//!
//! This module contains the request-side helpers shared by the news and
//! topic endpoints.

use axum::extract::FromRequest;
use serde::Deserialize;

use crate::api::middleware::ApiError;
use crate::config::PaginationConfig;
use crate::models::Pagination;

/// JSON body extractor that reports decode failures with the error envelope
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

// ============================================================================
// Pagination Query Types
// ============================================================================

/// Raw pagination query parameters.
///
/// Kept as strings so that unparseable values fall back to the defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl PaginationQuery {
    pub fn resolve(&self, config: &PaginationConfig) -> Pagination {
        resolve_pagination(self.page.as_deref(), self.per_page.as_deref(), config)
    }
}

/// Parse `page`/`per_page`, falling back to 1 and the configured default
pub fn resolve_pagination(
    page: Option<&str>,
    per_page: Option<&str>,
    config: &PaginationConfig,
) -> Pagination {
    let page = parse_number(page).unwrap_or(1);
    let per_page = parse_number(per_page).unwrap_or(config.default_per_page);
    Pagination::new(page, per_page, config.max_per_page)
}

fn parse_number(value: Option<&str>) -> Option<u32> {
    value.and_then(|v| v.trim().parse::<u32>().ok())
}
