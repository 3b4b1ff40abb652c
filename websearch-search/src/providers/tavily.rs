//! Tavily search API client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use websearch_core::{
    retry_async, RetryConfig, SearchConfig, SearchItem, SearchProvider, SearchResult,
    WebSearchResult,
};

use super::{
    create_http_client, endpoint, handle_response_error, require_api_key, transport_error,
    DEFAULT_TAVILY_URL,
};

const PROVIDER: &str = "tavily";

/// Tavily search client
pub struct TavilySearchProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    config: SearchConfig,
    retry: RetryConfig,
}

/// Tavily search request
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    include_images: bool,
    include_answer: bool,
    include_raw_content: bool,
    max_results: usize,
    include_domains: &'a [String],
    exclude_domains: &'a [String],
}

/// Tavily search response
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyHit>,
}

/// Tavily search hit
#[derive(Debug, Deserialize)]
struct TavilyHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

impl From<TavilyHit> for SearchItem {
    fn from(hit: TavilyHit) -> Self {
        SearchItem::new(hit.title, hit.url, hit.content)
    }
}

impl TavilySearchProvider {
    /// Create a new Tavily client
    pub fn new(config: &SearchConfig) -> WebSearchResult<Self> {
        let api_key = require_api_key(config, "TAVILY_API_KEY")?;
        let client = create_http_client(config)?;
        let endpoint = endpoint(config, DEFAULT_TAVILY_URL, "search")?;

        debug!("Created Tavily client for {}", endpoint);

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

    async fn search_once(&self, query: &str) -> WebSearchResult<SearchResult> {
        let request = TavilyRequest {
            api_key: &self.api_key,
            query,
            search_depth: &self.config.search_depth,
            include_images: false,
            include_answer: false,
            include_raw_content: false,
            max_results: self.config.max_results,
            include_domains: &self.config.include_domains,
            exclude_domains: &self.config.exclude_domains,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(e, PROVIDER))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, PROVIDER).await);
        }

        let body: TavilyResponse = response
            .json()
            .await
            .map_err(|e| transport_error(e, PROVIDER))?;

        let items: Vec<SearchItem> = body.results.into_iter().map(SearchItem::from).collect();
        debug!(query = query, count = items.len(), "Tavily search completed");

        Ok(SearchResult::new(query, items))
    }
}

#[async_trait]
impl SearchProvider for TavilySearchProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn search(&self, query: &str) -> WebSearchResult<SearchResult> {
        retry_async(|| self.search_once(query), &self.retry, "tavily_search").await
    }
}
