//! Contoso Suites Web API
//!
//! axum surface over `suites-core`: hotel lookups, text vectorization,
//! maintenance request vector search and the maintenance copilot.

pub mod api;
pub mod config;
pub mod import;

pub use api::{build_router, build_router_with_limit, serve, ApiError, AppState};
pub use config::{AppConfig, ConfigError};
