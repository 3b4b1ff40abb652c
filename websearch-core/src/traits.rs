//! Core trait definitions
//!
//! The four external capabilities consumed by the refinement loop. Implementations are
//! injected into the loop by the caller; any of them may fail with a [`ProviderError`].

use crate::error::{WebSearchError, WebSearchResult};
use crate::types::*;
use async_trait::async_trait;

/// Error type returned by every capability
pub type ProviderError = WebSearchError;

/// Query rewrite capability
#[async_trait]
pub trait QueryRewriteService: Send + Sync {
    /// Capability name used in logs
    fn name(&self) -> &str;

    /// Produce alternative phrasings of a query
    async fn rewrite(&self, query: &str) -> WebSearchResult<RewriteSet>;
}

/// Web search capability, invoked concurrently
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Run one search
    async fn search(&self, query: &str) -> WebSearchResult<SearchResult>;
}

/// Evidence judgment capability
#[async_trait]
pub trait EvidenceJudgeService: Send + Sync {
    fn name(&self) -> &str;

    /// Decide whether the evidence answers its original query
    async fn judge(&self, evidence: &AggregatedEvidence) -> WebSearchResult<Verdict>;
}

/// Answer synthesis capability
#[async_trait]
pub trait AnswerSynthesisService: Send + Sync {
    fn name(&self) -> &str;

    /// Compose the final answer from the evidence of the answered iteration
    async fn synthesize(&self, evidence: &AggregatedEvidence) -> WebSearchResult<FinalAnswer>;
}
