//! Provider adapters against a local stub server

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use websearch_core::{RetryConfig, SearchConfig, SearchProvider, WebSearchError};
use websearch_search::{SerperSearchProvider, TavilySearchProvider};

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: Value,
    requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

async fn stub_handler(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> impl IntoResponse {
    state.requests.lock().unwrap().push((headers, request));
    (state.status, Json(state.body.clone()))
}

/// Start a stub serving `body` with `status` on POST /search, returning its base URL
async fn start_stub(status: StatusCode, body: Value) -> (String, StubState) {
    let state = StubState {
        status,
        body,
        requests: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/search", post(stub_handler))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

fn search_config(provider: &str, base_url: &str) -> SearchConfig {
    SearchConfig {
        provider: provider.to_string(),
        api_key: Some("test-key".to_string()),
        base_url: Some(base_url.to_string()),
        timeout_seconds: 5,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_tavily_maps_results_and_sends_fixed_options() {
    let (base_url, state) = start_stub(
        StatusCode::OK,
        json!({
            "query": "ignored",
            "results": [
                {"title": "Rust", "url": "https://rust-lang.org", "content": "A language", "score": 0.9},
                {"title": "Tokio", "url": "https://tokio.rs", "content": "A runtime"}
            ]
        }),
    )
    .await;

    let provider = TavilySearchProvider::new(&search_config("tavily", &base_url))
        .unwrap()
        .with_retry(RetryConfig::none());
    let result = provider.search("what is rust").await.unwrap();

    assert_eq!(result.query, "what is rust");
    assert_eq!(result.count, 2);
    assert_eq!(result.items[0].title, "Rust");
    assert_eq!(result.items[1].url, "https://tokio.rs");
    assert_eq!(result.items[1].content, "A runtime");

    let requests = state.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let body = &requests[0].1;
    assert_eq!(body["api_key"], "test-key");
    assert_eq!(body["query"], "what is rust");
    assert_eq!(body["search_depth"], "advanced");
    assert_eq!(body["max_results"], 3);
    assert_eq!(body["include_images"], false);
    assert_eq!(body["include_answer"], false);
    assert_eq!(body["include_raw_content"], false);
}

#[tokio::test]
async fn test_tavily_empty_results() {
    let (base_url, _state) = start_stub(StatusCode::OK, json!({"results": []})).await;

    let provider = TavilySearchProvider::new(&search_config("tavily", &base_url))
        .unwrap()
        .with_retry(RetryConfig::none());
    let result = provider.search("obscure").await.unwrap();

    assert_eq!(result.count, 0);
    assert!(result.items.is_empty());
}

#[tokio::test]
async fn test_serper_maps_organic_hits() {
    let (base_url, state) = start_stub(
        StatusCode::OK,
        json!({
            "searchParameters": {"q": "rust"},
            "organic": [
                {"title": "One", "link": "https://one.example", "snippet": "first"},
                {"title": "Two", "link": "https://two.example", "snippet": "second"},
                {"title": "Three", "link": "https://three.example", "snippet": "third"},
                {"title": "Four", "link": "https://four.example", "snippet": "fourth"}
            ]
        }),
    )
    .await;

    let mut config = search_config("serper", &base_url);
    config.include_domains = vec!["one.example".to_string()];
    let provider = SerperSearchProvider::new(&config)
        .unwrap()
        .with_retry(RetryConfig::none());
    let result = provider.search("rust").await.unwrap();

    // Truncated to max_results and keyed by the undecorated query
    assert_eq!(result.query, "rust");
    assert_eq!(result.count, 3);
    assert_eq!(result.items[0].url, "https://one.example");
    assert_eq!(result.items[2].content, "third");

    let requests = state.requests.lock().unwrap();
    let (headers, body) = &requests[0];
    assert_eq!(headers.get("x-api-key").unwrap(), "test-key");
    assert_eq!(body["q"], "site:one.example rust");
    assert_eq!(body["num"], 3);
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let (base_url, state) =
        start_stub(StatusCode::UNAUTHORIZED, json!({"detail": "bad key"})).await;

    let provider = TavilySearchProvider::new(&search_config("tavily", &base_url))
        .unwrap()
        .with_retry(RetryConfig {
            max_attempts: 3,
            initial_delay_ms: 1,
            max_delay_ms: 5,
            backoff_multiplier: 1.0,
            jitter: false,
        });
    let result = provider.search("rust").await;

    assert!(matches!(result, Err(WebSearchError::Authentication { .. })));
    assert_eq!(state.requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_server_error_is_retried_then_reported() {
    let (base_url, state) =
        start_stub(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "down"})).await;

    let provider = SerperSearchProvider::new(&search_config("serper", &base_url))
        .unwrap()
        .with_retry(RetryConfig {
            max_attempts: 2,
            initial_delay_ms: 1,
            max_delay_ms: 5,
            backoff_multiplier: 1.0,
            jitter: false,
        });
    let result = provider.search("rust").await;

    match result {
        Err(error @ WebSearchError::Network { .. }) => {
            assert!(error.to_string().contains("500"));
        }
        other => panic!("Expected Network error, got {:?}", other.map(|r| r.count)),
    }
    assert_eq!(state.requests.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_malformed_body_is_provider_error() {
    let (base_url, _state) = start_stub(StatusCode::OK, json!({"results": "not a list"})).await;

    let provider = TavilySearchProvider::new(&search_config("tavily", &base_url))
        .unwrap()
        .with_retry(RetryConfig::none());
    let result = provider.search("rust").await;

    assert!(matches!(result, Err(WebSearchError::Provider { .. })));
}
