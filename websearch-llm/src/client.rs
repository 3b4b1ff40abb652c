//! LLM client integration using siumai
//!
//! Wraps a siumai chat capability so the rest of the crate can send a system prompt
//! plus user input and get text back, whatever provider sits behind it.

use crate::error::{LlmServiceError, LlmServiceResult};
use siumai::prelude::{ChatCapability, ChatMessage, LlmBuilder};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use websearch_core::LlmConfig;

/// Chat client bound to one provider, model and temperature
#[derive(Clone)]
pub struct LlmClient {
    chat: Arc<dyn ChatCapability>,
    info: ModelInfo,
}

/// Information about the model behind a client
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub provider: String,
    pub model: String,
    pub temperature: f32,
}

impl ModelInfo {
    pub fn summary(&self) -> String {
        format!(
            "{}/{} (temp: {:.1})",
            self.provider, self.model, self.temperature
        )
    }
}

impl LlmClient {
    /// Build a client for `model` at `temperature` using the provider settings in `config`
    pub async fn new(config: &LlmConfig, model: &str, temperature: f32) -> LlmServiceResult<Self> {
        let chat = Self::build_client(config, model, temperature).await?;

        info!(
            provider = %config.provider,
            model = model,
            temperature = temperature,
            "Created LLM client"
        );

        Ok(Self {
            chat,
            info: ModelInfo {
                provider: config.provider.clone(),
                model: model.to_string(),
                temperature,
            },
        })
    }

    /// Wrap an existing chat capability
    pub fn from_capability(chat: Arc<dyn ChatCapability>, info: ModelInfo) -> Self {
        Self { chat, info }
    }

    fn api_key(config: &LlmConfig, env_var: &str) -> LlmServiceResult<String> {
        config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(env_var).ok())
            .ok_or_else(|| {
                LlmServiceError::Config(format!(
                    "{} API key not found, set {} or llm.api_key",
                    config.provider, env_var
                ))
            })
    }

    /// Build the appropriate siumai client based on configuration
    async fn build_client(
        config: &LlmConfig,
        model: &str,
        temperature: f32,
    ) -> LlmServiceResult<Arc<dyn ChatCapability>> {
        match config.provider.to_lowercase().as_str() {
            "openai" => {
                let api_key = Self::api_key(config, "OPENAI_API_KEY")?;

                let mut builder = LlmBuilder::new()
                    .openai()
                    .api_key(&api_key)
                    .model(model)
                    .temperature(temperature)
                    .max_tokens(config.max_tokens);

                if let Some(base_url) = &config.base_url {
                    builder = builder.base_url(base_url);
                }

                let client = builder.build().await.map_err(|e| {
                    LlmServiceError::Llm(format!("Failed to build OpenAI client: {}", e))
                })?;

                Ok(Arc::new(client))
            }
            "anthropic" => {
                let api_key = Self::api_key(config, "ANTHROPIC_API_KEY")?;

                let client = LlmBuilder::new()
                    .anthropic()
                    .api_key(&api_key)
                    .model(model)
                    .temperature(temperature)
                    .max_tokens(config.max_tokens)
                    .build()
                    .await
                    .map_err(|e| {
                        LlmServiceError::Llm(format!("Failed to build Anthropic client: {}", e))
                    })?;

                Ok(Arc::new(client))
            }
            "ollama" => {
                let base_url = config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| "http://localhost:11434".to_string());

                let client = LlmBuilder::new()
                    .ollama()
                    .model(model)
                    .base_url(&base_url)
                    .temperature(temperature)
                    .max_tokens(config.max_tokens)
                    .build()
                    .await
                    .map_err(|e| {
                        LlmServiceError::Llm(format!("Failed to build Ollama client: {}", e))
                    })?;

                Ok(Arc::new(client))
            }
            "groq" => {
                let api_key = Self::api_key(config, "GROQ_API_KEY")?;

                let client = LlmBuilder::new()
                    .groq()
                    .api_key(&api_key)
                    .model(model)
                    .temperature(temperature)
                    .max_tokens(config.max_tokens)
                    .build()
                    .await
                    .map_err(|e| {
                        LlmServiceError::Llm(format!("Failed to build Groq client: {}", e))
                    })?;

                Ok(Arc::new(client))
            }
            provider => Err(LlmServiceError::Config(format!(
                "Unsupported LLM provider: {}",
                provider
            ))),
        }
    }

    /// Generate a response using the LLM
    pub async fn generate(&self, messages: Vec<ChatMessage>) -> LlmServiceResult<String> {
        let start_time = Instant::now();

        debug!("Generating response with {} messages", messages.len());

        let response = self
            .chat
            .chat_with_tools(messages, None)
            .await
            .map_err(|e| LlmServiceError::Llm(format!("LLM generation failed: {}", e)))?;

        match response.content_text() {
            Some(content) if !content.trim().is_empty() => {
                debug!(
                    model = %self.info.model,
                    duration_ms = start_time.elapsed().as_millis() as u64,
                    chars = content.len(),
                    "Generated response"
                );
                Ok(content.to_string())
            }
            _ => Err(LlmServiceError::EmptyResponse),
        }
    }

    /// Generate a response with system and user messages
    pub async fn generate_with_system(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> LlmServiceResult<String> {
        let messages = vec![
            ChatMessage::system(system_prompt).build(),
            ChatMessage::user(user_message).build(),
        ];

        self.generate(messages).await
    }

    /// Test the connection to the LLM provider
    pub async fn test_connection(&self) -> LlmServiceResult<()> {
        debug!("Testing connection to LLM provider: {}", self.info.provider);

        let messages = vec![ChatMessage::user(
            "Hello! Please respond with 'OK' to confirm the connection.",
        )
        .build()];

        match self.generate(messages).await {
            Ok(response) => {
                info!(
                    "Connection test successful. Response: {}",
                    response.chars().take(50).collect::<String>()
                );
                Ok(())
            }
            Err(e) => {
                warn!("Connection test failed: {}", e);
                Err(e)
            }
        }
    }

    /// Get model information
    pub fn model_info(&self) -> &ModelInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unsupported_provider() {
        let config = LlmConfig {
            provider: "bedrock".to_string(),
            ..Default::default()
        };

        let result = LlmClient::new(&config, "model", 0.5).await;
        assert!(matches!(result, Err(LlmServiceError::Config(_))));
    }

    #[test]
    fn test_model_info_summary() {
        let info = ModelInfo {
            provider: "anthropic".to_string(),
            model: "claude-3-5-sonnet-20240620".to_string(),
            temperature: 0.7,
        };
        assert_eq!(info.summary(), "anthropic/claude-3-5-sonnet-20240620 (temp: 0.7)");
    }
}
