/// Study Video Recommender
///
/// Matches learning topics (or free text) to educational videos: live search
/// through a video provider with query variants, duration and relevance
/// gating, one-video-per-topic greedy assignment, engagement backfill, and a
/// curated catalog fallback.

pub mod config;
pub mod error;
pub mod llm;
pub mod recommend;
pub mod search;
pub mod video;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{ConfigError, ProviderError};
pub use crate::llm::{LLMConfig, LLMProvider, LlmTopicExtractor, TopicExtractor};
pub use crate::recommend::{RecommendMode, RecommendRequest, Recommender};
pub use crate::search::{CuratedCatalog, VideoProvider, YouTubeProvider};
pub use crate::video::{CandidateVideo, RelevanceFilter};
