//! Newsroom - A news and topic management API
//!
//! This library provides the core functionality of the newsroom service:
//! news with a draft/published/deleted lifecycle, topics, and the HTTP API
//! exposing both.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
