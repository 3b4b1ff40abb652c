//! Search provider clients
//!
//! Shared HTTP plumbing for the vendor adapters plus a factory that picks one from config.

use std::sync::Arc;
use websearch_core::{ErrorContext, SearchConfig, SearchProvider, WebSearchError, WebSearchResult};

pub mod serper;
pub mod tavily;


pub use serper::SerperSearchProvider;
pub use tavily::TavilySearchProvider;

pub const DEFAULT_TAVILY_URL: &str = "https://api.tavily.com";
pub const DEFAULT_SERPER_URL: &str = "https://google.serper.dev";

const USER_AGENT: &str = concat!("websearch-agent/", env!("CARGO_PKG_VERSION"));

/// Factory for creating search providers
pub struct SearchProviderFactory;

impl SearchProviderFactory {
    /// Create a provider based on `config.provider`
    pub fn create(config: &SearchConfig) -> WebSearchResult<Arc<dyn SearchProvider>> {
        match config.provider.to_lowercase().as_str() {
            "tavily" => Ok(Arc::new(TavilySearchProvider::new(config)?)),
            "serper" | "google" => Ok(Arc::new(SerperSearchProvider::new(config)?)),
            other => Err(WebSearchError::Config {
                message: format!("Unsupported search provider: {}", other),
                source: None,
                context: ErrorContext::new("search_provider_factory")
                    .with_operation("create")
                    .with_suggestion("Supported providers: tavily, serper"),
            }),
        }
    }
}

/// Fetch the API key or fail with a configuration error naming the variable to set
pub(crate) fn require_api_key(config: &SearchConfig, env_var: &str) -> WebSearchResult<String> {
    config
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| WebSearchError::Config {
            message: format!("{} search provider requires an API key", config.provider),
            source: None,
            context: ErrorContext::new("search_provider")
                .with_operation("require_api_key")
                .with_suggestion(&format!("Set {} or search.api_key", env_var)),
        })
}

/// Resolve the endpoint for `path` under the configured or default base URL
pub(crate) fn endpoint(
    config: &SearchConfig,
    default_base: &str,
    path: &str,
) -> WebSearchResult<String> {
    let base = config.base_url.as_deref().unwrap_or(default_base);
    url::Url::parse(base).map_err(|e| WebSearchError::Config {
        message: format!("Invalid search base URL '{}': {}", base, e),
        source: Some(Box::new(e)),
        context: ErrorContext::new("search_provider").with_operation("endpoint"),
    })?;

    Ok(format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

/// Helper function to create HTTP client with common configuration
pub(crate) fn create_http_client(config: &SearchConfig) -> WebSearchResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| WebSearchError::Config {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("http_client").with_operation("create_client"),
        })
}

/// Map a reqwest failure; only connection-level problems are recoverable
pub(crate) fn transport_error(error: reqwest::Error, provider: &str) -> WebSearchError {
    let context = ErrorContext::new(provider).with_operation("search");
    if error.is_decode() {
        WebSearchError::Provider {
            message: format!("Malformed response from {}: {}", provider, error),
            provider: provider.to_string(),
            source: Some(Box::new(error)),
            context,
        }
    } else if error.is_timeout() {
        WebSearchError::Timeout {
            operation: format!("{} search", provider),
            duration_ms: 0,
            context,
        }
    } else {
        WebSearchError::Network {
            message: format!("Request to {} failed: {}", provider, error),
            source: Some(Box::new(error)),
            context,
        }
    }
}

/// Helper function to turn an unsuccessful HTTP response into an error
pub(crate) async fn handle_response_error(
    response: reqwest::Response,
    provider: &str,
) -> WebSearchError {
    let status = response.status();
    let retry_after_ms = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(|secs| secs * 1000);

    let error_body = response.text().await.unwrap_or_default();
    let message = format!(
        "HTTP {} from {}: {}",
        status.as_u16(),
        provider,
        if error_body.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error")
        } else {
            &error_body
        }
    );
    let context = ErrorContext::new(provider)
        .with_operation("search")
        .with_metadata("status", &status.as_u16().to_string());

    match status.as_u16() {
        401 | 403 => WebSearchError::Authentication {
            message,
            context: context.with_suggestion("Check your search API key"),
        },
        429 => WebSearchError::RateLimit {
            message,
            retry_after_ms,
            context: context.with_suggestion("Reduce request rate or upgrade the plan"),
        },
        500..=599 => WebSearchError::Network {
            message,
            source: None,
            context: context.with_suggestion("Provider is unavailable, retry later"),
        },
        _ => WebSearchError::Provider {
            message,
            provider: provider.to_string(),
            source: None,
            context,
        },
    }
}
