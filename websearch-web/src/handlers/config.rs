//! Configuration handlers

use super::types::ConfigSummary;
use crate::AppState;
use axum::{extract::State, response::Json};

fn is_set(key: &Option<String>) -> bool {
    key.as_deref().is_some_and(|k| !k.trim().is_empty())
}

/// Get the loaded configuration without secrets
#[utoipa::path(
    get,
    path = "/api/config",
    tag = "Configuration",
    summary = "Get server configuration",
    description = "Providers, models and loop limits in use. API keys are reported only as present or absent.",
    responses(
        (status = 200, description = "Configuration retrieved successfully", body = ConfigSummary)
    )
)]
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigSummary> {
    let config = &state.config;
    let research = state.engine.config();

    Json(ConfigSummary {
        search_provider: config.search.provider.clone(),
        search_api_key_set: is_set(&config.search.api_key),
        max_results: config.search.max_results,
        llm_provider: config.llm.provider.clone(),
        llm_api_key_set: is_set(&config.llm.api_key),
        model: config.llm.model.clone(),
        fast_model: config.llm.fast_model.clone(),
        max_iterations: research.max_iterations,
        rewrite_count: research.rewrite_count,
        max_consecutive_failures: research.max_consecutive_failures,
    })
}
