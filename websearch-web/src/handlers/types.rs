//! Request and response types used by the handlers

use axum::{http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[schema(example = "0.1.0")]
    pub version: String,
    #[schema(example = 42)]
    pub uptime_seconds: u64,
}

/// Advanced search request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchRequest {
    /// The question to answer
    #[schema(example = "Who won the 2024 Tour de France?")]
    pub query: String,
    /// Overrides the configured iteration budget for this request (1 to 10)
    #[schema(example = 3)]
    pub max_iterations: Option<usize>,
}

/// Error payload returned with non-2xx responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "invalid_input")]
    pub error: String,
    pub message: String,
}

/// Non-secret view of the loaded configuration
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfigSummary {
    #[schema(example = "tavily")]
    pub search_provider: String,
    pub search_api_key_set: bool,
    #[schema(example = 3)]
    pub max_results: usize,
    #[schema(example = "openai")]
    pub llm_provider: String,
    pub llm_api_key_set: bool,
    pub model: String,
    pub fast_model: String,
    #[schema(example = 3)]
    pub max_iterations: usize,
    #[schema(example = 3)]
    pub rewrite_count: usize,
    pub max_consecutive_failures: Option<usize>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}
