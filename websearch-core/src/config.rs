//! Configuration management
//!
//! `AgentConfig` is loaded from TOML, then overridden from the environment. API keys may
//! live in either place; nothing is read from ambient state once the config is built.

use crate::error::{ErrorContext, WebSearchError, WebSearchResult};
use crate::logging::LoggingConfig;
use crate::types::{DEFAULT_MAX_ITERATIONS, DEFAULT_REWRITE_COUNT, MAX_ITERATIONS_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for the advanced search agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub search: SearchConfig,
    pub llm: LlmConfig,
    pub research: ResearchConfig,
    pub logging: LoggingConfig,
}

/// Web search provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Provider name (tavily, serper)
    pub provider: String,
    /// API key (optional, can be set via environment)
    pub api_key: Option<String>,
    /// Override for the provider endpoint
    pub base_url: Option<String>,
    /// Maximum results requested per query
    pub max_results: usize,
    /// Provider search depth (basic, advanced)
    pub search_depth: String,
    pub include_domains: Vec<String>,
    pub exclude_domains: Vec<String>,
    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,
    /// Attempts per search, including the first
    pub max_attempts: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: "tavily".to_string(),
            api_key: None,
            base_url: None,
            max_results: 3,
            search_depth: "advanced".to_string(),
            include_domains: Vec::new(),
            exclude_domains: Vec::new(),
            timeout_seconds: 30,
            max_attempts: 2,
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider type (openai, anthropic, ollama, groq)
    pub provider: String,
    /// Model used for rewrite, judgment and synthesis
    pub model: String,
    /// Cheaper model for lightweight calls
    pub fast_model: String,
    /// API key (optional, can be set via environment)
    pub api_key: Option<String>,
    /// Base URL for custom providers
    pub base_url: Option<String>,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-3-5-sonnet-20240620".to_string(),
            fast_model: "claude-3-haiku-20240307".to_string(),
            api_key: None,
            base_url: None,
            max_tokens: 4096,
        }
    }
}

/// Refinement loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Maximum number of refinement iterations
    pub max_iterations: usize,
    /// Phrasings requested per rewrite
    pub rewrite_count: usize,
    /// Stop early after this many consecutive judge failures (disabled when unset)
    pub max_consecutive_failures: Option<usize>,
    pub rewrite_timeout_ms: u64,
    pub search_timeout_ms: u64,
    pub judge_timeout_ms: u64,
    pub synthesize_timeout_ms: u64,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            rewrite_count: DEFAULT_REWRITE_COUNT,
            max_consecutive_failures: None,
            rewrite_timeout_ms: 60_000,
            search_timeout_ms: 45_000,
            judge_timeout_ms: 90_000,
            synthesize_timeout_ms: 120_000,
        }
    }
}

impl AgentConfig {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("websearch-agent")
            .join("config.toml")
    }

    /// Load config from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> WebSearchResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| WebSearchError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: AgentConfig = toml::from_str(&content).map_err(|e| WebSearchError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Load from `path` if given, else from the default location if it exists, else defaults.
    /// Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> WebSearchResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Save config to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> WebSearchResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| WebSearchError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content).map_err(|e| WebSearchError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Copy with API keys masked, for display
    pub fn redacted(&self) -> Self {
        let mask = |key: &Option<String>| key.as_ref().map(|_| "********".to_string());
        let mut config = self.clone();
        config.search.api_key = mask(&self.search.api_key);
        config.llm.api_key = mask(&self.llm.api_key);
        config
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(provider) = lookup("SEARCH_PROVIDER") {
            self.search.provider = provider.to_ascii_lowercase();
        }

        let key_var = match self.search.provider.as_str() {
            "serper" | "google" => "SERPER_API_KEY",
            _ => "TAVILY_API_KEY",
        };
        if let Some(api_key) = lookup(key_var) {
            self.search.api_key = Some(api_key);
        }

        if let Some(provider) = lookup("LLM_PROVIDER") {
            self.llm.provider = provider.to_ascii_lowercase();
        }
        if let Some(model) = lookup("SMART_LLM") {
            self.llm.model = model;
        }
        if let Some(model) = lookup("FAST_LLM") {
            self.llm.fast_model = model;
        }

        if let Some(max_iterations) = lookup("MAX_ITERATIONS").and_then(|v| v.parse().ok()) {
            self.research.max_iterations = max_iterations;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level.trim().to_ascii_lowercase();
        }
    }

    /// Validate config
    pub fn validate(&self) -> WebSearchResult<()> {
        let checks: [(bool, &str, &str); 9] = [
            (
                self.research.max_iterations == 0,
                "research.max_iterations must be at least 1",
                "Set research.max_iterations to a positive value",
            ),
            (
                self.research.max_iterations > MAX_ITERATIONS_LIMIT,
                "research.max_iterations exceeds the allowed maximum of 10",
                "Lower research.max_iterations to 10 or less",
            ),
            (
                self.research.rewrite_count == 0,
                "research.rewrite_count must be at least 1",
                "Set research.rewrite_count to a positive value",
            ),
            (
                self.research.max_consecutive_failures == Some(0),
                "research.max_consecutive_failures must be at least 1 when set",
                "Remove the setting to disable early termination",
            ),
            (
                self.research.rewrite_timeout_ms == 0
                    || self.research.search_timeout_ms == 0
                    || self.research.judge_timeout_ms == 0
                    || self.research.synthesize_timeout_ms == 0,
                "research timeouts must be greater than 0",
                "Set every research.*_timeout_ms to a positive value",
            ),
            (
                self.search.max_results == 0,
                "search.max_results must be at least 1",
                "Set search.max_results to a positive value",
            ),
            (
                self.search.max_attempts == 0,
                "search.max_attempts must be at least 1",
                "Set search.max_attempts to 1 to disable retries",
            ),
            (
                self.search.timeout_seconds == 0,
                "search.timeout_seconds must be greater than 0",
                "Set search.timeout_seconds to a positive value",
            ),
            (
                self.llm.max_tokens == 0,
                "llm.max_tokens must be greater than 0",
                "Set llm.max_tokens to a positive value",
            ),
        ];

        if let Some((_, message, suggestion)) = checks.iter().find(|(failed, _, _)| *failed) {
            return Err(WebSearchError::Config {
                message: message.to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion(suggestion),
            });
        }

        Ok(())
    }
}
