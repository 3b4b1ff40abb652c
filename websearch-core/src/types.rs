//! Core data type definitions
//!
//! The data model flowing through one refinement run: a query is rewritten into a
//! [`RewriteSet`], each rewritten query yields a [`SearchResult`], the results of one
//! iteration form the [`AggregatedEvidence`] that is judged into a [`Verdict`], and a
//! run always ends in a [`RunResult`].

use serde::{Deserialize, Serialize};

/// Default refinement budget
pub const DEFAULT_MAX_ITERATIONS: usize = 3;

/// Largest refinement budget a run may ask for
pub const MAX_ITERATIONS_LIMIT: usize = 10;

/// Default number of phrasings produced per rewrite
pub const DEFAULT_REWRITE_COUNT: usize = 3;

/// Alternative phrasings of one query, produced fresh each iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteSet {
    pub original_query: String,
    pub rewritten_queries: Vec<String>,
}

impl RewriteSet {
    /// Degraded rewrite: the input query once, nothing else
    pub fn passthrough(query: &str) -> Self {
        Self {
            original_query: query.to_string(),
            rewritten_queries: vec![query.to_string()],
        }
    }

    pub fn len(&self) -> usize {
        self.rewritten_queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewritten_queries.is_empty()
    }
}

/// One web search hit, reduced to the fields the core understands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    pub title: String,
    pub url: String,
    #[serde(alias = "snippet")]
    pub content: String,
}

impl SearchItem {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
        }
    }
}

/// Results for a single query. `count == 0` with no items marks a provider failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    #[serde(alias = "results")]
    pub items: Vec<SearchItem>,
    pub count: usize,
}

impl SearchResult {
    /// Build a result whose count matches its items
    pub fn new(query: impl Into<String>, items: Vec<SearchItem>) -> Self {
        let count = items.len();
        Self {
            query: query.into(),
            items,
            count,
        }
    }

    /// Empty result standing in for a failed search
    pub fn failed(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            items: Vec::new(),
            count: 0,
        }
    }
}

/// Everything one iteration found, handed to the judge and the synthesizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedEvidence {
    pub original_query: String,
    pub rewritten_queries: Vec<String>,
    pub search_results: Vec<SearchResult>,
}

impl AggregatedEvidence {
    pub fn new(
        original_query: impl Into<String>,
        rewrite: RewriteSet,
        search_results: Vec<SearchResult>,
    ) -> Self {
        Self {
            original_query: original_query.into(),
            rewritten_queries: rewrite.rewritten_queries,
            search_results,
        }
    }

    /// Sum of `count` over every search result
    pub fn total_results(&self) -> usize {
        self.search_results.iter().map(|r| r.count).sum()
    }

    /// Distinct sources across all results, first occurrence wins
    pub fn sources(&self) -> Vec<Reference> {
        let mut seen = std::collections::HashSet::new();
        self.search_results
            .iter()
            .flat_map(|r| r.items.iter())
            .filter(|item| seen.insert(item.url.clone()))
            .map(|item| Reference {
                title: item.title.clone(),
                url: item.url.clone(),
            })
            .collect()
    }
}

/// Judgment of whether the evidence answers the query.
///
/// When `answered` is false, `explanation` is used verbatim as the next iteration's query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(alias = "is_question_answered")]
    pub answered: bool,
    pub explanation: String,
}

impl Verdict {
    pub fn answered(explanation: impl Into<String>) -> Self {
        Self {
            answered: true,
            explanation: explanation.into(),
        }
    }

    pub fn unanswered(explanation: impl Into<String>) -> Self {
        Self {
            answered: false,
            explanation: explanation.into(),
        }
    }
}

/// A cited source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub title: String,
    pub url: String,
}

/// Synthesized answer with the sources it drew on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalAnswer {
    pub original_query: String,
    pub answer: String,
    #[serde(default)]
    pub references: Vec<Reference>,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    Answered,
    Exhausted,
}

/// The result of one advanced search run, returned on success and on exhaustion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub original_query: String,
    pub outcome: RunOutcome,
    pub final_answer: FinalAnswer,
    #[serde(alias = "search_iterations")]
    pub iterations_used: usize,
    #[serde(alias = "total_queries")]
    pub total_queries_issued: usize,
    #[serde(alias = "total_results")]
    pub total_results_retrieved: usize,
}

impl RunResult {
    pub fn is_answered(&self) -> bool {
        self.outcome == RunOutcome::Answered
    }
}
