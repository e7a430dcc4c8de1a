pub mod providers;
pub mod topics;

pub use topics::{LlmTopicExtractor, TopicExtractor};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// LLM provider types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LLMProvider {
    LMStudio,
    Gemini,
    OpenAI,
}

impl FromStr for LLMProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lmstudio" | "lm-studio" | "lm_studio" => Ok(LLMProvider::LMStudio),
            "gemini" => Ok(LLMProvider::Gemini),
            "openai" => Ok(LLMProvider::OpenAI),
            other => Err(anyhow!("Unknown LLM provider: {}", other)),
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    /// API endpoint (LMStudio and OpenAI-compatible servers)
    pub endpoint: Option<String>,
    /// API key (cloud providers)
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::Gemini,
            endpoint: None,
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            max_tokens: 512,
            temperature: 0.2,
            timeout_seconds: 30,
        }
    }
}

impl LLMConfig {
    /// Whether a provider can be built from this configuration without a network call
    pub fn is_configured(&self) -> bool {
        let has_key = self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty());
        match self.provider {
            LLMProvider::Gemini | LLMProvider::OpenAI => has_key,
            LLMProvider::LMStudio => self.endpoint.is_some(),
        }
    }
}

/// Chat message for LLM communication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// LLM response
#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub tokens_used: Option<u32>,
}

/// Trait for LLM providers
#[async_trait]
pub trait LLM: Send + Sync {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse>;
    fn provider_type(&self) -> LLMProvider;
}

/// Create LLM instance based on configuration
pub fn create_llm(config: &LLMConfig) -> Result<Box<dyn LLM>> {
    match config.provider {
        LLMProvider::Gemini => Ok(Box::new(providers::GeminiProvider::new(config.clone())?)),
        LLMProvider::OpenAI | LLMProvider::LMStudio => {
            Ok(Box::new(providers::ChatCompletionsProvider::new(config.clone())?))
        }
    }
}
