//! Agent action-group invocation adapter
//!
//! Accepts the event an agent runtime sends to an action-group function, runs the
//! advanced search for its `search_query` parameter, and wraps the outcome in the text
//! response envelope the runtime expects. Every event gets a response, including
//! malformed ones.

use crate::{research::AdvancedSearchEngine, ApplicationResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Action group reported when the event itself could not be read
pub const DEFAULT_ACTION_GROUP: &str = "action-group-advanced-web-search";

/// Function reported when the event itself could not be read
pub const DEFAULT_FUNCTION: &str = "advanced-web-search";

pub const DEFAULT_MESSAGE_VERSION: &str = "1.0";

/// Parameter carrying the caller's question
pub const SEARCH_QUERY_PARAMETER: &str = "search_query";

pub const INVALID_QUERY_BODY: &str = "Error: Invalid search query";

/// Incoming action-group event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionGroupEvent {
    pub message_version: String,
    pub action_group: String,
    pub function: String,
    #[serde(default)]
    pub parameters: Vec<ActionParameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParameter {
    pub name: String,
    #[serde(rename = "type", default)]
    pub param_type: String,
    #[serde(default)]
    pub value: String,
}

impl ActionGroupEvent {
    /// The first non-blank `search_query` parameter
    pub fn search_query(&self) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.name == SEARCH_QUERY_PARAMETER)
            .map(|p| p.value.as_str())
            .filter(|value| !value.trim().is_empty())
    }
}

/// Response envelope returned to the agent runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionGroupResponse {
    pub response: ActionResponse,
    pub message_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub action_group: String,
    pub function: String,
    pub function_response: FunctionResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub response_body: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBody {
    #[serde(rename = "TEXT")]
    pub text: TextBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBody {
    pub body: String,
}

impl ActionGroupResponse {
    /// Build a plain-text response
    pub fn text(
        action_group: impl Into<String>,
        function: impl Into<String>,
        message_version: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            response: ActionResponse {
                action_group: action_group.into(),
                function: function.into(),
                function_response: FunctionResponse {
                    response_body: ResponseBody {
                        text: TextBody { body: body.into() },
                    },
                },
            },
            message_version: message_version.into(),
        }
    }

    /// Error response under the default action group and function
    pub fn error(message_version: impl Into<String>, error: &dyn std::fmt::Display) -> Self {
        Self::text(
            DEFAULT_ACTION_GROUP,
            DEFAULT_FUNCTION,
            message_version,
            format!("An error occurred while processing the request: {}", error),
        )
    }

    pub fn body(&self) -> &str {
        &self.response.function_response.response_body.text.body
    }
}

/// Runs action-group events through an [`AdvancedSearchEngine`]
#[derive(Clone)]
pub struct ActionGroupHandler {
    engine: AdvancedSearchEngine,
}

impl ActionGroupHandler {
    pub fn new(engine: AdvancedSearchEngine) -> Self {
        Self { engine }
    }

    /// Handle a raw JSON event; an unreadable event gets an error response
    pub async fn handle_value(&self, event: serde_json::Value) -> ActionGroupResponse {
        let message_version = event
            .get("messageVersion")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_MESSAGE_VERSION)
            .to_string();

        match serde_json::from_value::<ActionGroupEvent>(event) {
            Ok(event) => self.handle(event).await,
            Err(e) => {
                error!(error = %e, "Malformed action group event");
                ActionGroupResponse::error(message_version, &e)
            }
        }
    }

    /// Handle a parsed event
    pub async fn handle(&self, event: ActionGroupEvent) -> ActionGroupResponse {
        info!(
            action_group = %event.action_group,
            function = %event.function,
            "Handling action group event"
        );

        match self.process(&event).await {
            Ok(body) => {
                debug!(body = %body, "Action group response body");
                ActionGroupResponse::text(
                    event.action_group,
                    event.function,
                    event.message_version,
                    body,
                )
            }
            Err(e) => {
                error!(error = %e, "Action group invocation failed");
                ActionGroupResponse::error(event.message_version, &e)
            }
        }
    }

    async fn process(&self, event: &ActionGroupEvent) -> ApplicationResult<String> {
        let Some(query) = event.search_query() else {
            return Ok(INVALID_QUERY_BODY.to_string());
        };

        let result = self.engine.run(query).await?;
        let json = serde_json::to_string_pretty(&result)?;

        Ok(format!(
            "Here are the advanced web search results for the query '{}':\n{}",
            query, json
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_parsing_and_query_extraction() {
        let event: ActionGroupEvent = serde_json::from_str(
            r#"{
                "messageVersion": "1.0",
                "agent": {"name": "web-agent"},
                "actionGroup": "action-group-advanced-web-search",
                "function": "advanced-web-search",
                "parameters": [
                    {"name": "other", "type": "string", "value": "x"},
                    {"name": "search_query", "type": "string", "value": "rust 2024 edition"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(event.search_query(), Some("rust 2024 edition"));
    }

    #[test]
    fn test_blank_query_is_missing() {
        let event = ActionGroupEvent {
            message_version: "1.0".to_string(),
            action_group: "ag".to_string(),
            function: "f".to_string(),
            parameters: vec![ActionParameter {
                name: SEARCH_QUERY_PARAMETER.to_string(),
                param_type: "string".to_string(),
                value: "   ".to_string(),
            }],
        };

        assert_eq!(event.search_query(), None);
    }

    #[test]
    fn test_response_shape() {
        let response = ActionGroupResponse::text("ag", "fn", "1.0", "hello");
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["messageVersion"], "1.0");
        assert_eq!(value["response"]["actionGroup"], "ag");
        assert_eq!(value["response"]["function"], "fn");
        assert_eq!(
            value["response"]["functionResponse"]["responseBody"]["TEXT"]["body"],
            "hello"
        );
        assert_eq!(response.body(), "hello");
    }

    #[test]
    fn test_error_response_uses_defaults() {
        let response = ActionGroupResponse::error("2.0", &"boom");

        assert_eq!(response.response.action_group, DEFAULT_ACTION_GROUP);
        assert_eq!(response.response.function, DEFAULT_FUNCTION);
        assert_eq!(response.message_version, "2.0");
        assert_eq!(
            response.body(),
            "An error occurred while processing the request: boom"
        );
    }
}
