//! Tests for the LLM-backed rewrite, judge and synthesis services

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use websearch_core::{
    AggregatedEvidence, AnswerSynthesisService, EvidenceJudgeService, QueryRewriteService,
    Reference, RewriteSet, SearchItem, SearchResult, WebSearchError,
};
use websearch_llm::{
    LlmAnswerSynthesizer, LlmClient, LlmEvidenceJudge, LlmQueryRewriter, ModelInfo,
};

/// Mock LLM client that replays scripted replies and records the user messages it saw
struct MockLlmClient {
    replies: Mutex<VecDeque<Result<String, String>>>,
    user_messages: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockLlmClient {
    fn new(replies: Vec<Result<&str, &str>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            user_messages: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl siumai::prelude::ChatCapability for MockLlmClient {
    async fn chat_with_tools<'a>(
        &'a self,
        messages: Vec<siumai::prelude::ChatMessage>,
        _tools: Option<Vec<siumai::prelude::Tool>>,
    ) -> Result<siumai::prelude::ChatResponse, siumai::prelude::LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(user) = messages.last().and_then(|m| m.content_text()) {
            self.user_messages.lock().unwrap().push(user.to_string());
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply".to_string()));

        match reply {
            Ok(text) => Ok(siumai::prelude::ChatResponse {
                id: Some("mock-response".to_string()),
                content: siumai::prelude::MessageContent::Text(text),
                model: Some("mock-model".to_string()),
                usage: None,
                finish_reason: Some(siumai::prelude::FinishReason::Stop),
                tool_calls: None,
                thinking: None,
                metadata: std::collections::HashMap::new(),
            }),
            Err(message) => Err(siumai::prelude::LlmError::UnsupportedOperation(message)),
        }
    }

    async fn chat_stream<'a>(
        &'a self,
        _messages: Vec<siumai::prelude::ChatMessage>,
        _tools: Option<Vec<siumai::prelude::Tool>>,
    ) -> Result<siumai::prelude::ChatStream, siumai::prelude::LlmError> {
        Err(siumai::prelude::LlmError::UnsupportedOperation(
            "Streaming not supported in mock".to_string(),
        ))
    }
}

fn client(mock: &Arc<MockLlmClient>) -> LlmClient {
    LlmClient::from_capability(
        mock.clone(),
        ModelInfo {
            provider: "mock".to_string(),
            model: "mock-model".to_string(),
            temperature: 0.5,
        },
    )
}

fn evidence() -> AggregatedEvidence {
    AggregatedEvidence::new(
        "latest quantum computing breakthroughs",
        RewriteSet {
            original_query: "latest quantum computing breakthroughs".to_string(),
            rewritten_queries: vec!["quantum error correction 2024".to_string()],
        },
        vec![SearchResult::new(
            "quantum error correction 2024",
            vec![SearchItem::new(
                "Error correction milestone",
                "https://example.com/qec",
                "Logical qubits below threshold",
            )],
        )],
    )
}

#[tokio::test]
async fn test_rewriter_returns_phrasings() {
    let mock = MockLlmClient::new(vec![Ok(r#"Sure!
{"original_query": "rust async", "rewritten_queries": ["Rust async/await tutorial", "  ", "How does Tokio schedule Rust futures", "Rust async runtimes comparison", "extra phrasing"]}"#)]);
    let rewriter = LlmQueryRewriter::new(client(&mock), 3);

    let rewrite = rewriter.rewrite("rust async").await.unwrap();

    assert_eq!(rewrite.original_query, "rust async");
    assert_eq!(
        rewrite.rewritten_queries,
        vec![
            "Rust async/await tutorial",
            "How does Tokio schedule Rust futures",
            "Rust async runtimes comparison",
        ]
    );

    let sent = mock.user_messages.lock().unwrap();
    assert!(sent[0].contains("<search_query>rust async</search_query>"));
}

#[tokio::test]
async fn test_rewriter_without_phrasings_is_validation_error() {
    let mock = MockLlmClient::new(vec![Ok(r#"{"original_query": "q", "rewritten_queries": []}"#)]);
    let rewriter = LlmQueryRewriter::new(client(&mock), 3);

    let result = rewriter.rewrite("q").await;
    assert!(matches!(result, Err(WebSearchError::Validation { .. })));
}

#[tokio::test]
async fn test_rewriter_transport_failure_is_provider_error() {
    let mock = MockLlmClient::new(vec![Err("connection reset")]);
    let rewriter = LlmQueryRewriter::new(client(&mock), 3);

    let result = rewriter.rewrite("q").await;
    assert!(matches!(result, Err(WebSearchError::Provider { .. })));
    assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_judge_parses_verdict_and_sends_evidence() {
    let mock = MockLlmClient::new(vec![Ok(
        r#"{"is_question_answered": false, "explanation": "quantum advantage experiments 2024"}"#,
    )]);
    let judge = LlmEvidenceJudge::new(client(&mock));

    let verdict = judge.judge(&evidence()).await.unwrap();

    assert!(!verdict.answered);
    assert_eq!(verdict.explanation, "quantum advantage experiments 2024");

    let sent = mock.user_messages.lock().unwrap();
    assert!(sent[0].contains("\"original_query\": \"latest quantum computing breakthroughs\""));
    assert!(sent[0].contains("https://example.com/qec"));
}

#[tokio::test]
async fn test_judge_rejects_blank_follow_up() {
    let mock = MockLlmClient::new(vec![Ok(
        r#"{"is_question_answered": false, "explanation": "   "}"#,
    )]);
    let judge = LlmEvidenceJudge::new(client(&mock));

    assert!(matches!(
        judge.judge(&evidence()).await,
        Err(WebSearchError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_judge_non_json_reply_is_validation_error() {
    let mock = MockLlmClient::new(vec![Ok("The results look good to me.")]);
    let judge = LlmEvidenceJudge::new(client(&mock));

    assert!(matches!(
        judge.judge(&evidence()).await,
        Err(WebSearchError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_synthesizer_keeps_original_query() {
    let mock = MockLlmClient::new(vec![Ok(r#"{
        "original_query": "something the model made up",
        "answer": "Error correction crossed the threshold.\n\nMore detail follows.",
        "references": [
            {"title": "Error correction milestone", "url": "https://example.com/qec"},
            {"title": "No link", "url": ""}
        ]
    }"#)]);
    let synthesizer = LlmAnswerSynthesizer::new(client(&mock));

    let answer = synthesizer.synthesize(&evidence()).await.unwrap();

    assert_eq!(answer.original_query, "latest quantum computing breakthroughs");
    assert!(answer.answer.starts_with("Error correction"));
    assert_eq!(answer.references.len(), 1);
    assert_eq!(answer.references[0].url, "https://example.com/qec");
}

#[tokio::test]
async fn test_synthesizer_drops_references_outside_evidence() {
    let mock = MockLlmClient::new(vec![Ok(r#"{
        "answer": "Error correction crossed the threshold.",
        "references": [
            {"title": "Invented", "url": "https://not-in-evidence.example/x"},
            {"url": " https://example.com/qec "},
            {"title": "Same source again", "url": "https://example.com/qec"}
        ]
    }"#)]);
    let synthesizer = LlmAnswerSynthesizer::new(client(&mock));

    let answer = synthesizer.synthesize(&evidence()).await.unwrap();

    let sources: Vec<String> = evidence().sources().into_iter().map(|s| s.url).collect();
    assert!(answer.references.iter().all(|r| sources.contains(&r.url)));
    assert_eq!(
        answer.references,
        vec![Reference {
            title: "Error correction milestone".to_string(),
            url: "https://example.com/qec".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_synthesizer_empty_reply_fails() {
    let mock = MockLlmClient::new(vec![Ok("")]);
    let synthesizer = LlmAnswerSynthesizer::new(client(&mock));

    assert!(synthesizer.synthesize(&evidence()).await.is_err());
}
