//! Query rewriting stage

use super::types::StageOutput;
use std::sync::Arc;
use tracing::{debug, warn};
use websearch_core::{with_timeout, QueryRewriteService, RewriteSet};

/// Turns the current query into the phrasings searched this iteration
#[derive(Clone)]
pub struct QueryRewriter {
    service: Arc<dyn QueryRewriteService>,
    rewrite_count: usize,
    timeout_ms: u64,
}

impl QueryRewriter {
    pub fn new(service: Arc<dyn QueryRewriteService>, rewrite_count: usize, timeout_ms: u64) -> Self {
        Self {
            service,
            rewrite_count,
            timeout_ms,
        }
    }

    /// Rewrite `query`, falling back to the query itself on any failure
    pub async fn rewrite(&self, query: &str) -> StageOutput<RewriteSet> {
        let result = with_timeout(self.service.rewrite(query), self.timeout_ms, "query_rewrite")
            .await
            .and_then(|rewrite| rewrite);

        match result {
            Ok(rewrite) => {
                let rewritten_queries: Vec<String> = rewrite
                    .rewritten_queries
                    .into_iter()
                    .filter(|q| !q.trim().is_empty())
                    .take(self.rewrite_count)
                    .collect();

                if rewritten_queries.is_empty() {
                    warn!(
                        service = self.service.name(),
                        query = query,
                        "Rewrite produced no usable queries, searching the query as given"
                    );
                    return StageOutput::fallback(RewriteSet::passthrough(query));
                }

                debug!(count = rewritten_queries.len(), "Query rewritten");
                StageOutput::ok(RewriteSet {
                    original_query: query.to_string(),
                    rewritten_queries,
                })
            }
            Err(e) => {
                warn!(
                    service = self.service.name(),
                    query = query,
                    error = %e,
                    "Query rewrite failed, searching the query as given"
                );
                StageOutput::fallback(RewriteSet::passthrough(query))
            }
        }
    }
}
