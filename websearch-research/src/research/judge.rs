//! Evidence judgment stage

use super::types::{StageOutput, JUDGE_FAILURE_EXPLANATION};
use std::sync::Arc;
use tracing::{debug, warn};
use websearch_core::{with_timeout, AggregatedEvidence, EvidenceJudgeService, Verdict};

/// Decides whether one iteration's evidence answers the query
#[derive(Clone)]
pub struct EvidenceJudge {
    service: Arc<dyn EvidenceJudgeService>,
    timeout_ms: u64,
}

impl EvidenceJudge {
    pub fn new(service: Arc<dyn EvidenceJudgeService>, timeout_ms: u64) -> Self {
        Self {
            service,
            timeout_ms,
        }
    }

    /// Judge `evidence`; any failure becomes a negative verdict with a fixed explanation
    pub async fn judge(&self, evidence: &AggregatedEvidence) -> StageOutput<Verdict> {
        let result = with_timeout(self.service.judge(evidence), self.timeout_ms, "evidence_judge")
            .await
            .and_then(|verdict| verdict);

        match result {
            // A negative verdict must carry the next query
            Ok(verdict) if verdict.answered || !verdict.explanation.trim().is_empty() => {
                debug!(answered = verdict.answered, "Evidence judged");
                StageOutput::ok(verdict)
            }
            Ok(_) => {
                warn!(
                    service = self.service.name(),
                    "Judge returned a negative verdict without a follow-up query"
                );
                StageOutput::fallback(Verdict::unanswered(JUDGE_FAILURE_EXPLANATION))
            }
            Err(e) => {
                warn!(service = self.service.name(), error = %e, "Evidence judgment failed");
                StageOutput::fallback(Verdict::unanswered(JUDGE_FAILURE_EXPLANATION))
            }
        }
    }
}
