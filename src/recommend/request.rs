//! Request surface consumed from the outer service layer

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Recommendation request as posted by clients.
///
/// Field handling is deliberately lenient: list elements may be any JSON
/// scalar and `max_results` may arrive as a number or a numeric string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendRequest {
    /// Preferred topic list
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub key_topics: Vec<String>,

    /// Used only when `key_topics` is empty
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub key_points: Vec<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub query: Option<String>,

    /// Alias for `query`, used when `query` is absent or blank
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: Option<String>,

    #[serde(default, deserialize_with = "lenient_count")]
    pub max_results: Option<usize>,
}

impl RecommendRequest {
    pub fn for_topics<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key_topics: topics.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn for_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Ordered topics: `key_topics` when it has usable entries, else `key_points`
    pub fn topics(&self) -> Vec<String> {
        let topics = normalize_topics(&self.key_topics);
        if topics.is_empty() {
            normalize_topics(&self.key_points)
        } else {
            topics
        }
    }

    /// Free text from `query`, falling back to `text`
    pub fn free_text(&self) -> Option<String> {
        [&self.query, &self.text]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Requested result count; absent or zero means `default`, anything above `limit` is clamped
    pub fn resolved_max_results(&self, default: usize, limit: usize) -> usize {
        match self.max_results {
            Some(n) if n > 0 => n.min(limit),
            _ => default.min(limit),
        }
    }
}

/// Trim topics, drop blanks, and remove case-insensitive duplicates keeping
/// the first spelling. Order is preserved.
pub fn normalize_topics<S: AsRef<str>>(topics: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    topics
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect())
}

/// Non-string values are ignored rather than failing the whole request
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().map(|n| n as usize),
        Some(Value::String(s)) => s.trim().parse::<usize>().ok(),
        _ => None,
    })
}
