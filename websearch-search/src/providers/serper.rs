//! Serper (Google search) API client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use websearch_core::{
    retry_async, RetryConfig, SearchConfig, SearchItem, SearchProvider, SearchResult,
    WebSearchResult,
};

use super::{
    create_http_client, endpoint, handle_response_error, require_api_key, transport_error,
    DEFAULT_SERPER_URL,
};

const PROVIDER: &str = "serper";

/// Serper search client
pub struct SerperSearchProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    config: SearchConfig,
    retry: RetryConfig,
}

#[derive(Debug, Serialize)]
struct SerperRequest {
    q: String,
    num: usize,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperHit>,
}

#[derive(Debug, Deserialize)]
struct SerperHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

impl From<SerperHit> for SearchItem {
    fn from(hit: SerperHit) -> Self {
        SearchItem::new(hit.title, hit.link, hit.snippet)
    }
}

impl SerperSearchProvider {
    /// Create a new Serper client
    pub fn new(config: &SearchConfig) -> WebSearchResult<Self> {
        let api_key = require_api_key(config, "SERPER_API_KEY")?;
        let client = create_http_client(config)?;
        let endpoint = endpoint(config, DEFAULT_SERPER_URL, "search")?;

        debug!("Created Serper client for {}", endpoint);

        Ok(Self {
            client,
            endpoint,
            api_key,
            config: config.clone(),
            retry: RetryConfig {
                max_attempts: config.max_attempts,
                ..Default::default()
            },
        })
    }

    /// Override the retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Serper has no domain filter parameters, so domains become `site:` operators
    pub(crate) fn build_query(&self, query: &str) -> String {
        let mut parts = Vec::new();

        match self.config.include_domains.as_slice() {
            [] => {}
            [domain] => parts.push(format!("site:{}", domain)),
            domains => parts.push(format!(
                "({})",
                domains
                    .iter()
                    .map(|d| format!("site:{}", d))
                    .collect::<Vec<_>>()
                    .join(" OR ")
            )),
        }

        parts.extend(
            self.config
                .exclude_domains
                .iter()
                .map(|d| format!("-site:{}", d)),
        );
        parts.push(query.to_string());
        parts.join(" ")
    }

    async fn search_once(&self, query: &str) -> WebSearchResult<SearchResult> {
        let request = SerperRequest {
            q: self.build_query(query),
            num: self.config.max_results,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(e, PROVIDER))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, PROVIDER).await);
        }

        let body: SerperResponse = response
            .json()
            .await
            .map_err(|e| transport_error(e, PROVIDER))?;

        // Serper ignores `num` on some plans
        let items: Vec<SearchItem> = body
            .organic
            .into_iter()
            .take(self.config.max_results)
            .map(SearchItem::from)
            .collect();
        debug!(query = query, count = items.len(), "Serper search completed");

        // Results are keyed by the caller's query, not the site-decorated one
        Ok(SearchResult::new(query, items))
    }
}

#[async_trait]
impl SearchProvider for SerperSearchProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn search(&self, query: &str) -> WebSearchResult<SearchResult> {
        retry_async(|| self.search_once(query), &self.retry, "serper_search").await
    }
}
