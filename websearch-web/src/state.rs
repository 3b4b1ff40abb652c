//! Shared application state

use crate::WebResult;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use websearch_core::AgentConfig;
use websearch_research::{ActionGroupHandler, AdvancedSearchEngine};

/// State shared by every request handler
#[derive(Clone)]
pub struct AppState {
    /// The refinement loop used by `/api/search`
    pub engine: AdvancedSearchEngine,
    /// Action-group adapter used by `/api/invoke`
    pub invocations: ActionGroupHandler,
    /// Loaded agent configuration
    pub config: Arc<AgentConfig>,
    pub started_at: Instant,
}

impl AppState {
    /// Wrap an already constructed engine
    pub fn new(engine: AdvancedSearchEngine, config: AgentConfig) -> Self {
        Self {
            invocations: ActionGroupHandler::new(engine.clone()),
            engine,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    /// Build the engine on the configured providers
    pub async fn from_config(config: AgentConfig) -> WebResult<Self> {
        let engine = AdvancedSearchEngine::from_config(&config).await?;
        info!(
            search_provider = %config.search.provider,
            llm_provider = %config.llm.provider,
            "Application state initialized"
        );
        Ok(Self::new(engine, config))
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
