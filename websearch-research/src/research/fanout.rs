//! Concurrent search fan-out

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};
use websearch_core::{with_timeout, SearchProvider, SearchResult};

/// Results of one fan-out, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct FanOutReport {
    pub results: Vec<SearchResult>,
    /// Searches that failed, timed out or panicked
    pub failed: usize,
}

impl FanOutReport {
    pub fn total_results(&self) -> usize {
        self.results.iter().map(|r| r.count).sum()
    }
}

/// Runs every rewritten query against the search provider at once
#[derive(Clone)]
pub struct SearchFanOut {
    provider: Arc<dyn SearchProvider>,
    timeout_ms: u64,
}

impl SearchFanOut {
    pub fn new(provider: Arc<dyn SearchProvider>, timeout_ms: u64) -> Self {
        Self {
            provider,
            timeout_ms,
        }
    }

    /// Search all `queries` concurrently and wait for every one of them.
    ///
    /// Returns exactly one result per query. A failed search yields an empty result for
    /// its query and never affects the others.
    pub async fn search_all(&self, queries: &[String]) -> FanOutReport {
        let handles: Vec<_> = queries
            .iter()
            .cloned()
            .map(|query| {
                let provider = Arc::clone(&self.provider);
                let timeout_ms = self.timeout_ms;
                tokio::spawn(async move {
                    let outcome = with_timeout(provider.search(&query), timeout_ms, "web_search")
                        .await
                        .and_then(|result| result);
                    (query, outcome)
                })
            })
            .collect();

        let mut failed = 0;
        let results = join_all(handles)
            .await
            .into_iter()
            .zip(queries)
            .map(|(joined, query)| match joined {
                Ok((query, Ok(result))) => {
                    // Count always reflects the items actually returned
                    SearchResult::new(query, result.items)
                }
                Ok((query, Err(e))) => {
                    warn!(
                        provider = self.provider.name(),
                        query = %query,
                        error = %e,
                        "Search failed"
                    );
                    failed += 1;
                    SearchResult::failed(query)
                }
                Err(e) => {
                    warn!(query = %query, error = %e, "Search task aborted");
                    failed += 1;
                    SearchResult::failed(query.clone())
                }
            })
            .collect();

        let report = FanOutReport { results, failed };
        debug!(
            queries = queries.len(),
            failed = report.failed,
            results = report.total_results(),
            "Fan-out completed"
        );
        report
    }
}
