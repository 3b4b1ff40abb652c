//! Structured JSON output from chat models

use crate::client::LlmClient;
use crate::error::{LlmServiceError, LlmServiceResult};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// A system prompt bound to a client whose replies are parsed into `T`
pub struct StructuredOutput<T> {
    client: LlmClient,
    system_prompt: String,
    _output: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> StructuredOutput<T> {
    pub fn new(client: LlmClient, system_prompt: impl Into<String>) -> Self {
        Self {
            client,
            system_prompt: system_prompt.into(),
            _output: PhantomData,
        }
    }

    pub fn client(&self) -> &LlmClient {
        &self.client
    }

    /// Send `input` under the system prompt and parse the reply
    pub async fn invoke(&self, input: &str) -> LlmServiceResult<T> {
        let reply = self
            .client
            .generate_with_system(&self.system_prompt, input)
            .await?;
        parse_structured(&reply)
    }
}

/// The outermost `{...}` span of `text`, ignoring prose or code fences around it
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse a model reply into `T`
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> LlmServiceResult<T> {
    let json = extract_json_object(text).ok_or_else(|| {
        LlmServiceError::InvalidResponse(format!(
            "no JSON object in reply: {}",
            text.chars().take(120).collect::<String>()
        ))
    })?;

    serde_json::from_str(json).map_err(|e| LlmServiceError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use websearch_core::Verdict;

    #[test]
    fn test_extract_json_from_fenced_reply() {
        let reply = "Here you go:\n```json\n{\"a\": {\"b\": 1}}\n```\nDone.";
        assert_eq!(extract_json_object(reply), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn test_extract_json_missing() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_parse_structured_verdict() {
        let verdict: Verdict = parse_structured(
            r#"{"is_question_answered": false, "explanation": "search for 2024 results"}"#,
        )
        .unwrap();
        assert!(!verdict.answered);
        assert_eq!(verdict.explanation, "search for 2024 results");
    }

    #[test]
    fn test_parse_structured_wrong_shape() {
        let result: LlmServiceResult<Verdict> = parse_structured(r#"{"verdict": "yes"}"#);
        assert!(matches!(result, Err(LlmServiceError::InvalidResponse(_))));
    }
}
