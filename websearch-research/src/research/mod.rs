//! Iterative refinement search
//!
//! The stages of one run, each wrapping an injected capability with a timeout and a
//! fallback value, and the [`AdvancedSearchEngine`] that drives them:
//! - [`QueryRewriter`] turns the current query into several phrasings
//! - [`SearchFanOut`] searches all phrasings concurrently
//! - [`EvidenceJudge`] decides whether the combined results answer the question
//! - [`AnswerSynthesizer`] writes the final answer

pub mod engine;
pub mod fanout;
pub mod judge;
pub mod rewriter;
pub mod synthesizer;
pub mod types;

pub use engine::AdvancedSearchEngine;
pub use fanout::{FanOutReport, SearchFanOut};
pub use judge::EvidenceJudge;
pub use rewriter::QueryRewriter;
pub use synthesizer::AnswerSynthesizer;
pub use types::*;
