//! Route definitions for the web server

use crate::{handlers, openapi, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/search", post(handlers::advanced_search))
        .route("/invoke", post(handlers::invoke_action_group))
        .route("/config", get(handlers::get_config))
}

/// Create documentation routes
pub fn doc_routes() -> Router<AppState> {
    Router::new().route("/api-docs/openapi.json", get(openapi::openapi_json))
}
