//! WebSearch LLM - language model services for the advanced search agent
//!
//! A siumai-backed [`LlmClient`], [`StructuredOutput`] for JSON replies, and the
//! LLM implementations of query rewriting, evidence judgment and answer synthesis.

pub mod client;
pub mod error;
pub mod prompts;
pub mod services;
pub mod structured;

pub use client::{LlmClient, ModelInfo};
pub use error::{LlmServiceError, LlmServiceResult};
pub use services::{
    check_connection, LlmAnswerSynthesizer, LlmEvidenceJudge, LlmQueryRewriter, LlmServices,
};
pub use structured::{extract_json_object, parse_structured, StructuredOutput};
