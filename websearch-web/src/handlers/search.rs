//! Advanced search handler

use super::types::{api_error, ApiError, SearchRequest};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{error, info};
use websearch_core::RunResult;

/// Run the refinement loop for a query
#[utoipa::path(
    post,
    path = "/api/search",
    tag = "Search",
    summary = "Advanced web search",
    description = "Rewrite, search, judge and refine until the results answer the query or the iteration budget runs out",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Run finished, answered or exhausted"),
        (status = 400, description = "Blank query or iteration budget outside 1..=10", body = super::types::ErrorResponse),
        (status = 500, description = "Run failed", body = super::types::ErrorResponse)
    )
)]
pub async fn advanced_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<RunResult>, ApiError> {
    info!(query = %request.query, "Advanced search requested");

    let engine = match request.max_iterations {
        Some(max_iterations) => state
            .engine
            .with_max_iterations(max_iterations)
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, "invalid_input", e.to_string()))?,
        None => state.engine.clone(),
    };

    match engine.run(&request.query).await {
        Ok(result) => Ok(Json(result)),
        Err(e) if e.is_invalid_input() => Err(api_error(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            e.to_string(),
        )),
        Err(e) => {
            error!("Advanced search failed: {}", e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "search_failed",
                e.to_string(),
            ))
        }
    }
}
