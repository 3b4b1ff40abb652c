//! Final answer synthesis stage

use super::types::{StageOutput, SYNTHESIS_FAILURE_ANSWER};
use std::sync::Arc;
use tracing::{debug, warn};
use websearch_core::{with_timeout, AggregatedEvidence, AnswerSynthesisService, FinalAnswer};

/// Writes the final answer once the judge is satisfied
#[derive(Clone)]
pub struct AnswerSynthesizer {
    service: Arc<dyn AnswerSynthesisService>,
    timeout_ms: u64,
}

impl AnswerSynthesizer {
    pub fn new(service: Arc<dyn AnswerSynthesisService>, timeout_ms: u64) -> Self {
        Self {
            service,
            timeout_ms,
        }
    }

    /// Synthesize an answer from `evidence`, or the fixed apology on failure
    pub async fn synthesize(&self, evidence: &AggregatedEvidence) -> StageOutput<FinalAnswer> {
        let result = with_timeout(
            self.service.synthesize(evidence),
            self.timeout_ms,
            "answer_synthesis",
        )
        .await
        .and_then(|answer| answer);

        match result {
            Ok(answer) => {
                debug!(references = answer.references.len(), "Final answer synthesized");
                StageOutput::ok(answer)
            }
            Err(e) => {
                warn!(service = self.service.name(), error = %e, "Answer synthesis failed");
                StageOutput::fallback(FinalAnswer {
                    original_query: evidence.original_query.clone(),
                    answer: SYNTHESIS_FAILURE_ANSWER.to_string(),
                    references: Vec::new(),
                })
            }
        }
    }
}
