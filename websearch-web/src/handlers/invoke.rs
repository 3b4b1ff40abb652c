//! Agent action-group invocation handler

use crate::AppState;
use axum::{extract::State, response::Json};
use tracing::info;
use websearch_research::ActionGroupResponse;

/// Handle an agent action-group event
///
/// Always answers 200; failures are reported inside the response body the way the
/// agent runtime expects.
#[utoipa::path(
    post,
    path = "/api/invoke",
    tag = "Agent",
    summary = "Invoke the action group",
    description = "Run the advanced search for the `search_query` parameter of an action-group event",
    request_body(content = serde_json::Value, description = "Action-group event"),
    responses(
        (status = 200, description = "Action-group response, including error bodies")
    )
)]
pub async fn invoke_action_group(
    State(state): State<AppState>,
    Json(event): Json<serde_json::Value>,
) -> Json<ActionGroupResponse> {
    info!("Handling action-group invocation");
    Json(state.invocations.handle_value(event).await)
}
