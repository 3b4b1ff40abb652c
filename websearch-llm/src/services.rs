//! LLM-backed implementations of the rewrite, judge and synthesis capabilities

use crate::client::LlmClient;
use crate::error::LlmServiceResult;
use crate::prompts::{
    judge_system_prompt, rewrite_system_prompt, rewrite_user_prompt, synthesis_system_prompt,
    JUDGE_TEMPERATURE, REWRITE_TEMPERATURE, SYNTHESIS_TEMPERATURE,
};
use crate::structured::StructuredOutput;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use websearch_core::{
    validation_error, AgentConfig, AggregatedEvidence, AnswerSynthesisService,
    EvidenceJudgeService, FinalAnswer, QueryRewriteService, Reference, RewriteSet, Verdict,
    WebSearchResult,
};

#[derive(Debug, Deserialize)]
struct RewriteReply {
    #[serde(default)]
    rewritten_queries: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SynthesisReply {
    answer: String,
    #[serde(default)]
    references: Vec<CitedSource>,
}

#[derive(Debug, Deserialize)]
struct CitedSource {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
}

/// Keep only citations that point at a source in the evidence, once each
fn cited_references(cited: Vec<CitedSource>, evidence: &AggregatedEvidence) -> Vec<Reference> {
    let sources = evidence.sources();
    let mut references: Vec<Reference> = Vec::new();

    for citation in cited {
        let url = citation.url.trim();
        let Some(source) = sources.iter().find(|s| s.url == url) else {
            debug!(url = url, "Dropping citation not found in the evidence");
            continue;
        };
        if references.iter().any(|r| r.url == source.url) {
            continue;
        }

        let title = citation.title.trim();
        references.push(Reference {
            title: if title.is_empty() {
                source.title.clone()
            } else {
                title.to_string()
            },
            url: source.url.clone(),
        });
    }

    references
}

fn evidence_input(evidence: &AggregatedEvidence) -> WebSearchResult<String> {
    Ok(serde_json::to_string_pretty(evidence)?)
}

/// Rewrites a query into alternative phrasings
pub struct LlmQueryRewriter {
    output: StructuredOutput<RewriteReply>,
    rewrite_count: usize,
}

impl LlmQueryRewriter {
    pub fn new(client: LlmClient, rewrite_count: usize) -> Self {
        Self {
            output: StructuredOutput::new(client, rewrite_system_prompt(rewrite_count)),
            rewrite_count,
        }
    }
}

#[async_trait]
impl QueryRewriteService for LlmQueryRewriter {
    fn name(&self) -> &str {
        "llm_query_rewriter"
    }

    async fn rewrite(&self, query: &str) -> WebSearchResult<RewriteSet> {
        let reply = self.output.invoke(&rewrite_user_prompt(query)).await?;

        let rewritten_queries: Vec<String> = reply
            .rewritten_queries
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .take(self.rewrite_count)
            .collect();

        if rewritten_queries.is_empty() {
            return Err(validation_error!(
                "model returned no usable rewritten queries",
                "rewritten_queries",
                "llm_query_rewriter"
            ));
        }

        debug!(query = query, count = rewritten_queries.len(), "Rewrote query");

        Ok(RewriteSet {
            original_query: query.to_string(),
            rewritten_queries,
        })
    }
}

/// Decides whether aggregated evidence answers the original query
pub struct LlmEvidenceJudge {
    output: StructuredOutput<Verdict>,
}

impl LlmEvidenceJudge {
    pub fn new(client: LlmClient) -> Self {
        Self {
            output: StructuredOutput::new(client, judge_system_prompt()),
        }
    }
}

#[async_trait]
impl EvidenceJudgeService for LlmEvidenceJudge {
    fn name(&self) -> &str {
        "llm_evidence_judge"
    }

    async fn judge(&self, evidence: &AggregatedEvidence) -> WebSearchResult<Verdict> {
        let verdict = self.output.invoke(&evidence_input(evidence)?).await?;

        // An unanswered verdict feeds the next iteration, so it needs a usable query
        if !verdict.answered && verdict.explanation.trim().is_empty() {
            return Err(validation_error!(
                "unanswered verdict without a follow-up query",
                "explanation",
                "llm_evidence_judge"
            ));
        }

        debug!(answered = verdict.answered, "Judged evidence");
        Ok(verdict)
    }
}

/// Writes the final answer from the evidence of the answered iteration
pub struct LlmAnswerSynthesizer {
    output: StructuredOutput<SynthesisReply>,
}

impl LlmAnswerSynthesizer {
    pub fn new(client: LlmClient) -> Self {
        Self {
            output: StructuredOutput::new(client, synthesis_system_prompt()),
        }
    }
}

#[async_trait]
impl AnswerSynthesisService for LlmAnswerSynthesizer {
    fn name(&self) -> &str {
        "llm_answer_synthesizer"
    }

    async fn synthesize(&self, evidence: &AggregatedEvidence) -> WebSearchResult<FinalAnswer> {
        let reply = self.output.invoke(&evidence_input(evidence)?).await?;

        if reply.answer.trim().is_empty() {
            return Err(validation_error!(
                "model returned an empty answer",
                "answer",
                "llm_answer_synthesizer"
            ));
        }

        let references = cited_references(reply.references, evidence);

        debug!(references = references.len(), "Synthesized final answer");

        Ok(FinalAnswer {
            original_query: evidence.original_query.clone(),
            answer: reply.answer,
            references,
        })
    }
}

/// The three LLM-backed capabilities, built from one configuration
#[derive(Clone)]
pub struct LlmServices {
    pub rewriter: Arc<LlmQueryRewriter>,
    pub judge: Arc<LlmEvidenceJudge>,
    pub synthesizer: Arc<LlmAnswerSynthesizer>,
}

impl LlmServices {
    /// Build one client per stage, each at its own temperature, all on the smart model
    pub async fn from_config(config: &AgentConfig) -> LlmServiceResult<Self> {
        let llm = &config.llm;
        let rewrite_client = LlmClient::new(llm, &llm.model, REWRITE_TEMPERATURE).await?;
        let judge_client = LlmClient::new(llm, &llm.model, JUDGE_TEMPERATURE).await?;
        let synthesis_client = LlmClient::new(llm, &llm.model, SYNTHESIS_TEMPERATURE).await?;

        Ok(Self {
            rewriter: Arc::new(LlmQueryRewriter::new(
                rewrite_client,
                config.research.rewrite_count,
            )),
            judge: Arc::new(LlmEvidenceJudge::new(judge_client)),
            synthesizer: Arc::new(LlmAnswerSynthesizer::new(synthesis_client)),
        })
    }
}

/// Check that the configured provider answers, using the fast model
pub async fn check_connection(config: &AgentConfig) -> LlmServiceResult<()> {
    let client = LlmClient::new(&config.llm, &config.llm.fast_model, 0.0).await?;
    client.test_connection().await
}
