//! Types for the refinement loop

use serde::{Deserialize, Serialize};
use websearch_core::{RunResult, Verdict};

/// Explanation returned when the judge call fails; the loop keeps iterating with it as the query
pub const JUDGE_FAILURE_EXPLANATION: &str = "Error occurred during analysis. The system encountered an issue while processing the search results. Please try again or refine your query for a new search.";

/// Answer returned when synthesis fails after a positive verdict
pub const SYNTHESIS_FAILURE_ANSWER: &str = "We apologize, but an error occurred while formulating the final answer. This could be due to a temporary system issue or complexity in processing the search results. Please try your query again or rephrase it for a new search.";

/// Sentinel answer for a run that used its whole budget without a positive verdict
pub const EXHAUSTED_ANSWER: &str = "Unable to find a satisfactory answer after multiple attempts";

/// A stage result plus whether it came from the fallback path
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutput<T> {
    pub value: T,
    pub degraded: bool,
}

impl<T> StageOutput<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            degraded: false,
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            degraded: true,
        }
    }
}

/// What happened in one iteration of the loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based iteration number
    pub iteration: usize,
    /// Query the iteration started from
    pub query: String,
    pub rewritten_queries: Vec<String>,
    pub results_retrieved: usize,
    pub verdict: Verdict,
    /// Rewrite fell back to the input query
    pub rewrite_degraded: bool,
    /// Searches that failed or timed out
    pub failed_searches: usize,
    /// Judge call failed and the fixed explanation was used
    pub judge_degraded: bool,
}

/// A run result together with its per-iteration history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTrace {
    pub result: RunResult,
    pub iterations: Vec<IterationRecord>,
}
