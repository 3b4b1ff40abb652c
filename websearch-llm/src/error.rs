//! LLM service errors

use thiserror::Error;
use websearch_core::{ErrorContext, WebSearchError};

/// Errors raised while talking to a language model
#[derive(Error, Debug)]
pub enum LlmServiceError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid structured response: {0}")]
    InvalidResponse(String),

    #[error("No text content in LLM response")]
    EmptyResponse,
}

pub type LlmServiceResult<T> = Result<T, LlmServiceError>;

impl From<LlmServiceError> for WebSearchError {
    fn from(err: LlmServiceError) -> Self {
        let context = ErrorContext::new("llm");
        match err {
            LlmServiceError::Config(message) => WebSearchError::Config {
                message,
                source: None,
                context: context.with_suggestion("Check the [llm] section or LLM_PROVIDER"),
            },
            LlmServiceError::InvalidResponse(message) => WebSearchError::Validation {
                message,
                field: None,
                context,
            },
            other => WebSearchError::Provider {
                message: other.to_string(),
                provider: "llm".to_string(),
                source: Some(Box::new(other)),
                context,
            },
        }
    }
}
