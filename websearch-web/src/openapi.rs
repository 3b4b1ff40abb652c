//! OpenAPI document for the web server

use axum::response::Json;
use utoipa::OpenApi;

use crate::handlers::{ConfigSummary, ErrorResponse, HealthResponse, SearchRequest};

/// OpenAPI document for the WebSearch API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "WebSearch API",
        version = "0.1.0",
        description = "Iterative web search agent that refines its query until the results answer it",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        crate::handlers::health_check,
        crate::handlers::advanced_search,
        crate::handlers::invoke_action_group,
        crate::handlers::get_config,
    ),
    components(
        schemas(
            HealthResponse,
            SearchRequest,
            ErrorResponse,
            ConfigSummary,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Search", description = "Advanced web search"),
        (name = "Agent", description = "Agent action-group integration"),
        (name = "Configuration", description = "Server configuration"),
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
