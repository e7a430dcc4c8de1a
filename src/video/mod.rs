/// Candidate video model and the pure scoring/filtering helpers applied to it
///
/// Everything in this module is side-effect free: the orchestrator feeds
/// candidates in and reads decisions back out.

pub mod duration;
pub mod engagement;
pub mod relevance;

pub use duration::decode_duration;
pub use engagement::engagement_score;
pub use relevance::RelevanceFilter;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Base URL for canonical playback links
pub const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

/// One search result returned by a video provider (or the curated catalog)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateVideo {
    /// Provider-assigned unique identifier
    #[serde(default)]
    pub video_id: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub channel_title: Option<String>,

    #[serde(default)]
    pub thumbnail: Option<String>,

    /// RFC 3339 publish timestamp as reported by the provider
    #[serde(default)]
    pub published_at: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Compact ISO-8601 duration token, e.g. `PT5M30S`
    #[serde(default)]
    pub duration: Option<String>,

    #[serde(default)]
    pub view_count: Option<Value>,

    #[serde(default)]
    pub like_count: Option<Value>,

    /// Raw statistics block from the provider
    #[serde(default)]
    pub statistics: Map<String, Value>,

    /// Topic this video was assigned to, `null` for backfill and fallback entries
    #[serde(rename = "matched_keyword", default)]
    pub matched_keyword: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CandidateVideo {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    /// Set the like count both in the statistics block and at top level
    pub fn with_like_count(mut self, likes: u64) -> Self {
        let value = Value::String(likes.to_string());
        self.statistics.insert("likeCount".to_string(), value.clone());
        self.like_count = Some(value);
        self
    }

    /// A candidate without an identifier can never be recommended
    pub fn has_id(&self) -> bool {
        !self.video_id.trim().is_empty()
    }

    /// Decoded duration in seconds (0 when missing or malformed)
    pub fn duration_seconds(&self) -> u64 {
        decode_duration(self.duration.as_deref())
    }

    pub fn engagement(&self) -> u64 {
        engagement_score(self)
    }

    /// Canonical playback URL for this video
    pub fn watch_url(&self) -> String {
        format!("{}{}", WATCH_URL_BASE, self.video_id)
    }

    /// Finalize a candidate for output: attach the matched topic and a playback URL
    pub fn into_ranked(mut self, matched_keyword: Option<String>) -> Self {
        self.matched_keyword = matched_keyword;
        if self.has_id() && self.url.is_none() {
            self.url = Some(self.watch_url());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_ranked_adds_url_and_keyword() {
        let video = CandidateVideo::new("abc123").into_ranked(Some("graphs".to_string()));
        assert_eq!(video.url.as_deref(), Some("https://www.youtube.com/watch?v=abc123"));
        assert_eq!(video.matched_keyword.as_deref(), Some("graphs"));
    }

    #[test]
    fn test_into_ranked_keeps_existing_url() {
        let mut video = CandidateVideo::new("abc123");
        video.url = Some("https://example.com/v/abc123".to_string());
        let ranked = video.into_ranked(None);
        assert_eq!(ranked.url.as_deref(), Some("https://example.com/v/abc123"));
        assert!(ranked.matched_keyword.is_none());
    }

    #[test]
    fn test_serializes_provider_field_names() {
        let video = CandidateVideo::new("xyz")
            .with_title("Graph theory lecture")
            .with_like_count(7)
            .into_ranked(None);
        let json = serde_json::to_value(&video).unwrap();

        assert_eq!(json["videoId"], "xyz");
        assert_eq!(json["statistics"]["likeCount"], "7");
        assert!(json["matched_keyword"].is_null());
        assert!(json.get("matched_keyword").is_some());
    }

    #[test]
    fn test_blank_id_is_unusable() {
        assert!(!CandidateVideo::new("  ").has_id());
        assert!(CandidateVideo::new("id").has_id());
    }
}
