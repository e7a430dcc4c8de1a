/// Video search provider interface and the YouTube Data API client
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::config::YouTubeConfig;
use crate::error::ProviderError;
use crate::video::CandidateVideo;

/// External video search collaborator.
///
/// No ordering guarantee is expected from implementations; callers rank
/// results themselves.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Search for up to `limit` videos matching `query`
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<CandidateVideo>, ProviderError>;

    /// Whether credentials are present. Unconfigured providers are never queried.
    fn is_configured(&self) -> bool;
}

/// YouTube Data API v3 client (search + videos detail lookup)
#[derive(Clone)]
pub struct YouTubeProvider {
    client: Client,
    config: YouTubeConfig,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: SearchItemId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: Option<String>,
    channel_title: Option<String>,
    published_at: Option<String>,
    description: Option<String>,
    #[serde(default)]
    thumbnails: HashMap<String, Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoDetails {
    id: String,
    content_details: Option<ContentDetails>,
    #[serde(default)]
    statistics: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

impl YouTubeProvider {
    pub fn new(config: YouTubeConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ProviderError::NotConfigured)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => ProviderError::Quota {
                    status: status.as_u16(),
                    body,
                },
                _ => ProviderError::Status { status: status.as_u16(), body },
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl VideoProvider for YouTubeProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<CandidateVideo>, ProviderError> {
        let api_key = self.api_key()?.to_string();

        let search_params = [
            ("part", "snippet".to_string()),
            ("q", query.to_string()),
            ("type", "video".to_string()),
            ("maxResults", limit.to_string()),
            ("key", api_key.clone()),
            ("relevanceLanguage", self.config.relevance_language.clone()),
        ];
        let search: SearchResponse = self.get_json(&self.config.search_url, &search_params).await?;

        // Results without an id are dropped on receipt
        let items: Vec<(String, Snippet)> = search
            .items
            .into_iter()
            .filter_map(|item| {
                let id = item.id.video_id.filter(|id| !id.trim().is_empty())?;
                Some((id, item.snippet))
            })
            .collect();

        if items.is_empty() {
            debug!("No videos returned for query '{}'", query);
            return Ok(Vec::new());
        }

        let ids = items.iter().map(|(id, _)| id.as_str()).collect::<Vec<_>>().join(",");
        let detail_params = [
            ("part", "contentDetails,statistics".to_string()),
            ("id", ids),
            ("key", api_key),
        ];
        let details: VideosResponse = self.get_json(&self.config.videos_url, &detail_params).await?;
        let mut details_by_id: HashMap<String, VideoDetails> =
            details.items.into_iter().map(|d| (d.id.clone(), d)).collect();

        let videos: Vec<CandidateVideo> = items
            .into_iter()
            .map(|(id, snippet)| {
                let details = details_by_id.remove(&id);
                build_candidate(id, snippet, details)
            })
            .collect();

        debug!("Query '{}' returned {} videos", query, videos.len());
        Ok(videos)
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }
}

fn build_candidate(video_id: String, mut snippet: Snippet, details: Option<VideoDetails>) -> CandidateVideo {
    let thumbnail = ["high", "default"]
        .iter()
        .find_map(|size| snippet.thumbnails.remove(*size).and_then(|t| t.url));

    let (duration, statistics) = match details {
        Some(d) => (d.content_details.and_then(|c| c.duration), d.statistics),
        None => (None, Map::new()),
    };

    CandidateVideo {
        video_id,
        title: snippet.title,
        channel_title: snippet.channel_title,
        thumbnail,
        published_at: snippet.published_at,
        description: snippet.description,
        duration,
        view_count: statistics.get("viewCount").cloned(),
        like_count: statistics.get("likeCount").cloned(),
        statistics,
        matched_keyword: None,
        url: None,
    }
}
