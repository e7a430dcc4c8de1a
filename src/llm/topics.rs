use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::{create_llm, ChatMessage, LLMConfig, LLM};

static ENUMERATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[.)]\s*").expect("enumeration pattern is valid"));

/// Derives short learning topics from free text.
///
/// Best-effort by contract: failures and missing configuration yield an
/// empty list, never an error.
#[async_trait]
pub trait TopicExtractor: Send + Sync {
    async fn extract(&self, text: &str, max_topics: usize) -> Vec<String>;
}

/// Topic extractor backed by a chat LLM
pub struct LlmTopicExtractor {
    llm: Option<Box<dyn LLM>>,
}

impl LlmTopicExtractor {
    /// Build from configuration. An unconfigured or unbuildable provider
    /// produces an extractor that always returns no topics.
    pub fn new(config: &LLMConfig) -> Self {
        if !config.is_configured() {
            debug!("LLM not configured, topic extraction disabled");
            return Self { llm: None };
        }

        match create_llm(config) {
            Ok(llm) => Self { llm: Some(llm) },
            Err(e) => {
                warn!("Failed to create LLM client for topic extraction: {}", e);
                Self { llm: None }
            }
        }
    }

    pub fn with_llm(llm: Box<dyn LLM>) -> Self {
        Self { llm: Some(llm) }
    }

    pub fn is_enabled(&self) -> bool {
        self.llm.is_some()
    }
}

#[async_trait]
impl TopicExtractor for LlmTopicExtractor {
    async fn extract(&self, text: &str, max_topics: usize) -> Vec<String> {
        let llm = match &self.llm {
            Some(llm) => llm,
            None => return Vec::new(),
        };

        if text.trim().is_empty() || max_topics == 0 {
            return Vec::new();
        }

        let messages = vec![
            ChatMessage::system(topic_prompt(max_topics)),
            ChatMessage::user(format!("Text:\n{}", text.trim())),
        ];

        match llm.chat(messages).await {
            Ok(response) => {
                let topics = parse_topic_lines(&response.content, max_topics);
                info!("🧠 Extracted {} topics from free text: {:?}", topics.len(), topics);
                topics
            }
            Err(e) => {
                warn!("Topic extraction failed: {}", e);
                Vec::new()
            }
        }
    }
}

fn topic_prompt(max_topics: usize) -> String {
    format!(
        "Extract {} short, distinct key learning topics from the user's text.\n\
         Return them as a plain list, one per line, no numbering, no bullets, no extra commentary.",
        max_topics
    )
}

/// Turn a line-oriented LLM reply into a deduplicated topic list.
///
/// Bullet markers and enumeration prefixes are stripped; duplicates are
/// compared case-insensitively and the first spelling wins.
pub fn parse_topic_lines(raw: &str, max_topics: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut topics = Vec::new();

    for line in raw.lines() {
        if topics.len() >= max_topics {
            break;
        }

        let line = line.trim_matches(|c: char| c == '-' || c == '•' || c == '*' || c.is_whitespace());
        let line = ENUMERATION_RE.replace(line, "");
        let line = line.trim();
        if line.is_empty() || line.starts_with("```") {
            continue;
        }

        if seen.insert(line.to_lowercase()) {
            topics.push(line.to_string());
        }
    }

    topics
}
