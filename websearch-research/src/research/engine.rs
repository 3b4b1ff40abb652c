//! Advanced search engine: the bounded rewrite, search, judge refinement loop

use super::{
    fanout::SearchFanOut,
    judge::EvidenceJudge,
    rewriter::QueryRewriter,
    synthesizer::AnswerSynthesizer,
    types::{IterationRecord, RunTrace, EXHAUSTED_ANSWER},
};
use crate::{ApplicationError, ApplicationResult};
use std::sync::Arc;
use tracing::{info, warn, Instrument};
use websearch_core::{
    log_operation_start, log_operation_success, performance::measure_async, AggregatedEvidence,
    AnswerSynthesisService, EvidenceJudgeService, FinalAnswer, QueryRewriteService,
    ResearchConfig, RunOutcome, RunResult, SearchProvider, MAX_ITERATIONS_LIMIT,
};

/// Iterative web search that refines its query until the evidence answers it.
///
/// Each iteration rewrites the current query, searches every phrasing concurrently and
/// asks the judge whether the combined results answer the caller's question. A positive
/// verdict ends the run with a synthesized answer. A negative one makes the judge's
/// explanation the next query, until `max_iterations` is spent.
///
/// Failures of the injected services never abort a run; each stage substitutes its
/// fallback value instead.
#[derive(Clone)]
pub struct AdvancedSearchEngine {
    config: ResearchConfig,
    rewriter: QueryRewriter,
    fanout: SearchFanOut,
    judge: EvidenceJudge,
    synthesizer: AnswerSynthesizer,
}

/// Running totals across iterations
#[derive(Debug, Default)]
struct Totals {
    queries: usize,
    results: usize,
}

impl AdvancedSearchEngine {
    /// Create an engine from its four capabilities.
    ///
    /// `max_iterations`, `rewrite_count` and `max_consecutive_failures` below 1 are
    /// raised to 1, and `max_iterations` is capped at [`MAX_ITERATIONS_LIMIT`].
    pub fn new(
        mut config: ResearchConfig,
        rewriter: Arc<dyn QueryRewriteService>,
        search: Arc<dyn SearchProvider>,
        judge: Arc<dyn EvidenceJudgeService>,
        synthesizer: Arc<dyn AnswerSynthesisService>,
    ) -> Self {
        config.max_iterations = config.max_iterations.clamp(1, MAX_ITERATIONS_LIMIT);
        config.rewrite_count = config.rewrite_count.max(1);
        config.max_consecutive_failures = config.max_consecutive_failures.map(|n| n.max(1));

        Self {
            rewriter: QueryRewriter::new(rewriter, config.rewrite_count, config.rewrite_timeout_ms),
            fanout: SearchFanOut::new(search, config.search_timeout_ms),
            judge: EvidenceJudge::new(judge, config.judge_timeout_ms),
            synthesizer: AnswerSynthesizer::new(synthesizer, config.synthesize_timeout_ms),
            config,
        }
    }

    /// A copy of this engine with a different iteration budget
    pub fn with_max_iterations(&self, max_iterations: usize) -> ApplicationResult<Self> {
        if max_iterations == 0 || max_iterations > MAX_ITERATIONS_LIMIT {
            return Err(ApplicationError::invalid_input(format!(
                "max_iterations must be between 1 and {}",
                MAX_ITERATIONS_LIMIT
            )));
        }

        let mut engine = self.clone();
        engine.config.max_iterations = max_iterations;
        Ok(engine)
    }

    pub fn config(&self) -> &ResearchConfig {
        &self.config
    }

    /// Run the refinement loop for `query`.
    ///
    /// The only error is [`ApplicationError::InvalidInput`] for an empty or blank query.
    pub async fn run(&self, query: &str) -> ApplicationResult<RunResult> {
        Ok(self.run_with_trace(query).await?.result)
    }

    /// Like [`run`](Self::run), also returning what happened in each iteration
    pub async fn run_with_trace(&self, query: &str) -> ApplicationResult<RunTrace> {
        if query.trim().is_empty() {
            return Err(ApplicationError::invalid_input("search query must not be empty"));
        }

        log_operation_start!(
            "advanced_search",
            query = query,
            max_iterations = self.config.max_iterations
        );

        let trace = measure_async("advanced_search", self.refine(query)).await;

        log_operation_success!(
            "advanced_search",
            outcome = ?trace.result.outcome,
            iterations_used = trace.result.iterations_used,
            total_queries_issued = trace.result.total_queries_issued,
            total_results_retrieved = trace.result.total_results_retrieved
        );

        Ok(trace)
    }

    async fn refine(&self, original_query: &str) -> RunTrace {
        let max_iterations = self.config.max_iterations;
        let mut current_query = original_query.to_string();
        let mut totals = Totals::default();
        let mut records = Vec::new();
        let mut consecutive_failures = 0;

        for iteration in 1..=max_iterations {
            let span = tracing::info_span!("iteration", iteration = iteration);

            let (record, evidence) = self
                .iterate(iteration, original_query, &current_query)
                .instrument(span.clone())
                .await;

            totals.queries += record.rewritten_queries.len();
            totals.results += record.results_retrieved;

            let verdict = record.verdict.clone();
            let judge_degraded = record.judge_degraded;
            records.push(record);

            if verdict.answered {
                let answer = self
                    .synthesizer
                    .synthesize(&evidence)
                    .instrument(span)
                    .await;
                info!(iteration = iteration, "Query answered");

                return RunTrace {
                    result: self.finish(
                        original_query,
                        RunOutcome::Answered,
                        answer.value,
                        iteration,
                        &totals,
                    ),
                    iterations: records,
                };
            }

            if judge_degraded {
                consecutive_failures += 1;
                if let Some(limit) = self.config.max_consecutive_failures {
                    if consecutive_failures >= limit {
                        warn!(
                            iteration = iteration,
                            consecutive_failures = consecutive_failures,
                            "Judge keeps failing, giving up early"
                        );
                        break;
                    }
                }
            } else {
                consecutive_failures = 0;
            }

            current_query = verdict.explanation;
        }

        let iterations_used = records.len();
        info!(iterations_used = iterations_used, "Iteration budget exhausted");

        RunTrace {
            result: self.finish(
                original_query,
                RunOutcome::Exhausted,
                FinalAnswer {
                    original_query: original_query.to_string(),
                    answer: EXHAUSTED_ANSWER.to_string(),
                    references: Vec::new(),
                },
                iterations_used,
                &totals,
            ),
            iterations: records,
        }
    }

    /// One rewrite, fan-out, aggregate, judge pass
    async fn iterate(
        &self,
        iteration: usize,
        original_query: &str,
        query: &str,
    ) -> (IterationRecord, AggregatedEvidence) {
        info!(query = query, "Starting iteration");

        let rewrite = measure_async("query_rewrite", self.rewriter.rewrite(query)).await;
        let fanout = measure_async(
            "search_fanout",
            self.fanout.search_all(&rewrite.value.rewritten_queries),
        )
        .await;
        let results_retrieved = fanout.total_results();

        let evidence = AggregatedEvidence::new(original_query, rewrite.value, fanout.results);
        let verdict = measure_async("evidence_judge", self.judge.judge(&evidence)).await;

        let record = IterationRecord {
            iteration,
            query: query.to_string(),
            rewritten_queries: evidence.rewritten_queries.clone(),
            results_retrieved,
            verdict: verdict.value,
            rewrite_degraded: rewrite.degraded,
            failed_searches: fanout.failed,
            judge_degraded: verdict.degraded,
        };

        (record, evidence)
    }

    fn finish(
        &self,
        original_query: &str,
        outcome: RunOutcome,
        final_answer: FinalAnswer,
        iterations_used: usize,
        totals: &Totals,
    ) -> RunResult {
        RunResult {
            original_query: original_query.to_string(),
            outcome,
            final_answer,
            iterations_used,
            total_queries_issued: totals.queries,
            total_results_retrieved: totals.results,
        }
    }
}
