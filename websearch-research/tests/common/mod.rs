//! Hand-written fake capabilities shared by the research tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use websearch_core::{
    provider_error, AggregatedEvidence, AnswerSynthesisService, EvidenceJudgeService,
    FinalAnswer, QueryRewriteService, Reference, ResearchConfig, RewriteSet, SearchItem,
    SearchProvider, SearchResult, Verdict, WebSearchResult,
};
use websearch_research::AdvancedSearchEngine;

/// Rewriter returning `"{query} #1".."{query} #n"`, or failing on scripted calls
pub struct FakeRewriter {
    pub variants: usize,
    /// 1-based call numbers that fail
    pub fail_on: Vec<usize>,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
    pub queries: Mutex<Vec<String>>,
}

impl FakeRewriter {
    pub fn new(variants: usize) -> Arc<Self> {
        Arc::new(Self {
            variants,
            fail_on: Vec::new(),
            delay: None,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn failing_on(variants: usize, fail_on: Vec<usize>) -> Arc<Self> {
        Arc::new(Self {
            variants,
            fail_on,
            delay: None,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn slow(variants: usize, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            variants,
            fail_on: Vec::new(),
            delay: Some(delay),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryRewriteService for FakeRewriter {
    fn name(&self) -> &str {
        "fake_rewriter"
    }

    async fn rewrite(&self, query: &str) -> WebSearchResult<RewriteSet> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.queries.lock().unwrap().push(query.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on.contains(&call) {
            return Err(provider_error!("rewrite unavailable", "fake", "fake_rewriter"));
        }

        Ok(RewriteSet {
            original_query: query.to_string(),
            rewritten_queries: (1..=self.variants)
                .map(|i| format!("{} #{}", query, i))
                .collect(),
        })
    }
}

/// Rewriter returning a fixed list of phrasings regardless of input
pub struct FixedRewriter {
    pub phrasings: Vec<String>,
}

#[async_trait]
impl QueryRewriteService for FixedRewriter {
    fn name(&self) -> &str {
        "fixed_rewriter"
    }

    async fn rewrite(&self, query: &str) -> WebSearchResult<RewriteSet> {
        Ok(RewriteSet {
            original_query: query.to_string(),
            rewritten_queries: self.phrasings.clone(),
        })
    }
}

/// Search returning `results_per_query` hits per query.
///
/// Queries containing `"fail"` error out and queries containing `"slow"` sleep first.
pub struct FakeSearch {
    pub results_per_query: usize,
    pub slow_delay: Duration,
    pub calls: AtomicUsize,
    pub queries: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeSearch {
    pub fn new(results_per_query: usize) -> Arc<Self> {
        Self::with_delay(results_per_query, Duration::from_millis(0))
    }

    pub fn with_delay(results_per_query: usize, slow_delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            results_per_query,
            slow_delay,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    fn name(&self) -> &str {
        "fake_search"
    }

    async fn search(&self, query: &str) -> WebSearchResult<SearchResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());

        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        // Yield so sibling searches get a chance to start
        tokio::time::sleep(Duration::from_millis(10)).await;
        if query.contains("slow") {
            tokio::time::sleep(self.slow_delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if query.contains("fail") {
            return Err(provider_error!("search backend down", "fake", "fake_search"));
        }

        let items = (1..=self.results_per_query)
            .map(|i| {
                SearchItem::new(
                    format!("{} result {}", query, i),
                    format!("https://example.com/{}/{}", query.replace(' ', "-"), i),
                    format!("content {} for {}", i, query),
                )
            })
            .collect();
        Ok(SearchResult::new(query, items))
    }
}

/// Judge replaying scripted verdicts; `None` entries simulate a transport failure
pub struct ScriptedJudge {
    script: Mutex<VecDeque<Option<Verdict>>>,
    pub calls: AtomicUsize,
    pub evidence: Mutex<Vec<AggregatedEvidence>>,
}

impl ScriptedJudge {
    pub fn new(script: Vec<Option<Verdict>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            evidence: Mutex::new(Vec::new()),
        })
    }

    /// A judge that never answers and always asks for `next`
    pub fn never_answers(next: &str, times: usize) -> Arc<Self> {
        Self::new(vec![Some(Verdict::unanswered(next)); times])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EvidenceJudgeService for ScriptedJudge {
    fn name(&self) -> &str {
        "scripted_judge"
    }

    async fn judge(&self, evidence: &AggregatedEvidence) -> WebSearchResult<Verdict> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.evidence.lock().unwrap().push(evidence.clone());

        match self.script.lock().unwrap().pop_front().flatten() {
            Some(verdict) => Ok(verdict),
            None => Err(provider_error!("judge unavailable", "fake", "scripted_judge")),
        }
    }
}

/// Synthesizer citing the first source of the evidence
pub struct FakeSynthesizer {
    pub fail: bool,
    pub calls: AtomicUsize,
    pub evidence: Mutex<Vec<AggregatedEvidence>>,
}

impl FakeSynthesizer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            calls: AtomicUsize::new(0),
            evidence: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            calls: AtomicUsize::new(0),
            evidence: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnswerSynthesisService for FakeSynthesizer {
    fn name(&self) -> &str {
        "fake_synthesizer"
    }

    async fn synthesize(&self, evidence: &AggregatedEvidence) -> WebSearchResult<FinalAnswer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.evidence.lock().unwrap().push(evidence.clone());

        if self.fail {
            return Err(provider_error!("synthesis unavailable", "fake", "fake_synthesizer"));
        }

        Ok(FinalAnswer {
            original_query: evidence.original_query.clone(),
            answer: format!(
                "Answer for {} drawn from {} results.",
                evidence.original_query,
                evidence.total_results()
            ),
            references: evidence.sources().into_iter().take(1).collect::<Vec<Reference>>(),
        })
    }
}

/// Research config with short timeouts for tests
pub fn test_config() -> ResearchConfig {
    ResearchConfig {
        rewrite_timeout_ms: 1_000,
        search_timeout_ms: 1_000,
        judge_timeout_ms: 1_000,
        synthesize_timeout_ms: 1_000,
        ..Default::default()
    }
}

pub fn engine(
    config: ResearchConfig,
    rewriter: Arc<dyn QueryRewriteService>,
    search: Arc<dyn SearchProvider>,
    judge: Arc<dyn EvidenceJudgeService>,
    synthesizer: Arc<dyn AnswerSynthesisService>,
) -> AdvancedSearchEngine {
    AdvancedSearchEngine::new(config, rewriter, search, judge, synthesizer)
}
