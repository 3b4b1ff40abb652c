//! WebSearch Research - the advanced web search agent
//!
//! Builds on the capability traits in `websearch-core`:
//!
//! - [`research`]: the refinement loop and its rewrite, fan-out, judge and synthesis stages
//! - [`invocation`]: the agent action-group adapter around the loop
//!
//! [`AdvancedSearchEngine::from_config`] wires the loop to the concrete search and LLM
//! adapters; tests and embedders inject their own capabilities with
//! [`AdvancedSearchEngine::new`].

pub mod invocation;
pub mod research;

pub use invocation::{ActionGroupEvent, ActionGroupHandler, ActionGroupResponse, ActionParameter};
pub use research::{
    AdvancedSearchEngine, IterationRecord, RunTrace, EXHAUSTED_ANSWER, JUDGE_FAILURE_EXPLANATION,
    SYNTHESIS_FAILURE_ANSWER,
};

use websearch_core::{AgentConfig, WebSearchError};
use websearch_llm::{LlmServiceError, LlmServices};
use websearch_search::SearchProviderFactory;

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Core error: {0}")]
    Core(#[from] WebSearchError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmServiceError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;

impl ApplicationError {
    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}

impl AdvancedSearchEngine {
    /// Build an engine on the configured search provider and LLM
    pub async fn from_config(config: &AgentConfig) -> ApplicationResult<Self> {
        config.validate()?;

        let search = SearchProviderFactory::create(&config.search)?;
        let llm = LlmServices::from_config(config).await?;

        tracing::info!(
            search_provider = search.name(),
            llm_provider = %config.llm.provider,
            model = %config.llm.model,
            max_iterations = config.research.max_iterations,
            "Advanced search engine ready"
        );

        Ok(Self::new(
            config.research.clone(),
            llm.rewriter,
            search,
            llm.judge,
            llm.synthesizer,
        ))
    }
}
