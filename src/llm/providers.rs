use super::{ChatMessage, LLMConfig, LLMProvider, LLMResponse, LLM};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

fn build_client(config: &LLMConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()?)
}

/// Gemini `generateContent` provider
pub struct GeminiProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiUsage {
    #[serde(rename = "totalTokenCount")]
    total_token_count: u32,
}

impl GeminiProvider {
    pub fn new(config: LLMConfig) -> Result<Self> {
        if config.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            return Err(anyhow!("Gemini API key required"));
        }

        let client = build_client(&config)?;
        Ok(Self { config, client })
    }

    fn url(&self) -> String {
        let base = self
            .config
            .endpoint
            .as_deref()
            .unwrap_or(GEMINI_BASE_URL)
            .trim_end_matches('/');
        format!("{}/models/{}:generateContent", base, self.config.model)
    }
}

#[async_trait]
impl LLM for GeminiProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow!("Gemini API key not configured"))?;

        let (system, conversation): (Vec<_>, Vec<_>) =
            messages.into_iter().partition(|m| m.role == "system");

        let join = |msgs: Vec<ChatMessage>| {
            msgs.into_iter()
                .map(|m| m.content)
                .collect::<Vec<_>>()
                .join("\n\n")
        };

        let system_text = join(system);
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: join(conversation) }],
            }],
            system_instruction: (!system_text.is_empty()).then(|| GeminiContent {
                parts: vec![GeminiPart { text: system_text }],
            }),
            generation_config: GeminiGenerationConfig {
                max_output_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            },
        };

        debug!("Sending request to Gemini model {}", self.config.model);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API error {}: {}", status, text));
        }

        let gemini_response: GeminiResponse = response.json().await?;

        let content = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| anyhow!("No response from Gemini"))?;

        Ok(LLMResponse {
            content,
            tokens_used: gemini_response.usage_metadata.map(|u| u.total_token_count),
        })
    }

    fn provider_type(&self) -> LLMProvider {
        LLMProvider::Gemini
    }
}

/// OpenAI chat-completions provider, also used for LMStudio and other compatible servers
pub struct ChatCompletionsProvider {
    config: LLMConfig,
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

impl ChatCompletionsProvider {
    pub fn new(config: LLMConfig) -> Result<Self> {
        let endpoint = match (&config.provider, &config.endpoint) {
            (_, Some(endpoint)) => endpoint.clone(),
            (LLMProvider::OpenAI, None) => OPENAI_CHAT_URL.to_string(),
            (provider, None) => return Err(anyhow!("{:?} endpoint not configured", provider)),
        };

        if config.provider == LLMProvider::OpenAI && config.api_key.is_none() {
            return Err(anyhow!("OpenAI API key required"));
        }

        let client = build_client(&config)?;
        Ok(Self { config, client, endpoint })
    }
}

#[async_trait]
impl LLM for ChatCompletionsProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        let request = ChatCompletionsRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending chat completion request to {}", self.endpoint);

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("{:?} API error {}: {}", self.config.provider, status, text));
        }

        let completion: ChatCompletionsResponse = response.json().await?;

        let content = completion
            .choices
            .first()
            .ok_or_else(|| anyhow!("No response from {:?}", self.config.provider))?
            .message
            .content
            .clone();

        Ok(LLMResponse {
            content,
            tokens_used: completion.usage.map(|u| u.total_tokens),
        })
    }

    fn provider_type(&self) -> LLMProvider {
        self.config.provider.clone()
    }
}
