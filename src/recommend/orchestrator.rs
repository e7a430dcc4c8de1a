/// Topic-to-video matching and ranking
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::pool::CandidatePool;
use super::request::{normalize_topics, RecommendRequest};
use crate::config::{Config, RecommendConfig};
use crate::llm::{LlmTopicExtractor, TopicExtractor};
use crate::search::{query_variants, CuratedCatalog, VideoProvider, YouTubeProvider};
use crate::video::{CandidateVideo, RelevanceFilter};

/// Which path a request took through the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendMode {
    /// One best video per topic, then backfill
    PerTopic,
    /// Top videos for a free-text query
    FreeText,
    /// Nothing to search for; curated picks only
    CatalogOnly,
    /// Provider has no credentials; curated lookup keyed by the request
    Unconfigured,
}

/// Recommendation engine. Holds no per-request state and is safe to share.
pub struct Recommender {
    provider: Arc<dyn VideoProvider>,
    topic_extractor: Option<Arc<dyn TopicExtractor>>,
    catalog: Arc<CuratedCatalog>,
    relevance: RelevanceFilter,
    settings: RecommendConfig,
    per_query_limit: usize,
}

impl Recommender {
    pub fn new(provider: Arc<dyn VideoProvider>, catalog: Arc<CuratedCatalog>, settings: RecommendConfig) -> Self {
        Self {
            provider,
            topic_extractor: None,
            catalog,
            relevance: settings.relevance_filter(),
            settings,
            per_query_limit: 6,
        }
    }

    /// Build the engine from configuration: YouTube provider, curated catalog
    /// (plus any extra catalog file) and an LLM topic extractor when configured.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;

        let provider = YouTubeProvider::new(config.youtube.clone())?;
        if !provider.is_configured() {
            warn!("⚠️ YOUTUBE_API_KEY not set, recommendations will come from the curated catalog");
        }

        let catalog = match &config.catalog.extra_catalog_file {
            Some(path) => CuratedCatalog::with_extra_file(path).await?,
            None => CuratedCatalog::builtin(),
        };

        let mut recommender = Self::new(Arc::new(provider), Arc::new(catalog), config.recommend.clone())
            .with_per_query_limit(config.youtube.per_query_limit);

        let extractor = LlmTopicExtractor::new(&config.llm);
        if extractor.is_enabled() {
            recommender = recommender.with_topic_extractor(Arc::new(extractor));
        }

        Ok(recommender)
    }

    pub fn with_topic_extractor(mut self, extractor: Arc<dyn TopicExtractor>) -> Self {
        self.topic_extractor = Some(extractor);
        self
    }

    pub fn with_per_query_limit(mut self, limit: usize) -> Self {
        self.per_query_limit = limit.max(1);
        self
    }

    /// Serve a client request
    pub async fn recommend(&self, request: &RecommendRequest) -> Vec<CandidateVideo> {
        let max_results =
            request.resolved_max_results(self.settings.default_max_results, self.settings.max_results_limit);
        let topics = request.topics();
        let free_text = request.free_text();
        self.recommend_for(&topics, free_text.as_deref(), max_results).await
    }

    /// Recommend up to `max_results` videos for ordered topics and/or free text.
    ///
    /// Never fails: upstream errors degrade to fewer results or curated picks.
    pub async fn recommend_for(
        &self,
        topics: &[String],
        free_text: Option<&str>,
        max_results: usize,
    ) -> Vec<CandidateVideo> {
        if max_results == 0 {
            return Vec::new();
        }

        let topics = normalize_topics(topics);
        let free_text = free_text.map(str::trim).filter(|t| !t.is_empty());

        let videos = if topics.is_empty() && free_text.is_none() {
            self.log_mode(RecommendMode::CatalogOnly);
            self.rank_unmatched(self.curated_candidates("", max_results), max_results)
        } else if !self.provider.is_configured() {
            self.log_mode(RecommendMode::Unconfigured);
            let query = match free_text {
                Some(text) => text.to_string(),
                None => topics
                    .iter()
                    .take(self.settings.max_topics)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            };
            self.rank_unmatched(self.curated_candidates(&query, max_results), max_results)
        } else if !topics.is_empty() {
            self.log_mode(RecommendMode::PerTopic);
            self.recommend_per_topic(&topics, max_results).await
        } else {
            let text = free_text.unwrap_or_default();
            let derived = self.derive_topics(text).await;
            if derived.is_empty() {
                self.log_mode(RecommendMode::FreeText);
                self.recommend_free_text(text, max_results).await
            } else {
                info!("🧠 Using topics derived from free text: {:?}", derived);
                self.log_mode(RecommendMode::PerTopic);
                self.recommend_per_topic(&derived, max_results).await
            }
        };

        info!("🎬 Returning {} recommended videos", videos.len());
        videos
    }

    fn log_mode(&self, mode: RecommendMode) {
        debug!("Recommendation mode: {:?}", mode);
    }

    async fn derive_topics(&self, text: &str) -> Vec<String> {
        match &self.topic_extractor {
            Some(extractor) => {
                let topics = extractor.extract(text, self.settings.extracted_topic_count).await;
                normalize_topics(&topics)
                    .into_iter()
                    .take(self.settings.extracted_topic_count)
                    .collect()
            }
            None => Vec::new(),
        }
    }

    /// Duration and relevance gate shared by every live-search path
    fn passes_filters(&self, video: &CandidateVideo) -> bool {
        video.has_id()
            && video.duration_seconds() >= self.settings.min_duration_seconds
            && self.relevance.is_relevant(video)
    }

    /// Issue queries in order and hand each successful batch to `consume`,
    /// stopping as soon as it breaks. Up to `fetch_concurrency` queries are in
    /// flight, but results are always delivered in query order. Failed queries
    /// are logged and skipped.
    async fn run_queries<F>(&self, queries: Vec<String>, mut consume: F)
    where
        F: FnMut(Vec<CandidateVideo>) -> ControlFlow<()>,
    {
        let limit = self.per_query_limit;
        let results = stream::iter(queries)
            .map(move |query| async move {
                let outcome = self.provider.search(&query, limit).await;
                (query, outcome)
            })
            .buffered(self.settings.fetch_concurrency.max(1));
        futures::pin_mut!(results);

        while let Some((query, outcome)) = results.next().await {
            match outcome {
                Ok(items) => {
                    debug!("🔍 '{}' returned {} videos", query, items.len());
                    if consume(items).is_break() {
                        break;
                    }
                }
                Err(e) => warn!("Video search failed for query '{}': {}", query, e),
            }
        }
    }

    async fn recommend_per_topic(&self, topics: &[String], max_results: usize) -> Vec<CandidateVideo> {
        if topics.len() > self.settings.max_topics {
            debug!("Truncating {} topics to {}", topics.len(), self.settings.max_topics);
        }
        let topics = &topics[..topics.len().min(self.settings.max_topics)];
        let cap = self.settings.per_topic_candidate_cap;

        let mut pool = CandidatePool::new();
        let mut used: HashSet<String> = HashSet::new();
        let mut result: Vec<CandidateVideo> = Vec::new();

        for topic in topics {
            let mut candidates = CandidatePool::new();

            self.run_queries(query_variants(topic), |items| {
                for video in items {
                    if !video.has_id() {
                        continue;
                    }
                    if self.passes_filters(&video) {
                        candidates.insert(video.clone());
                    }
                    pool.insert(video);
                }
                if candidates.len() >= cap {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .await;

            // Strictly greater keeps the first-encountered candidate on ties
            let mut best: Option<&CandidateVideo> = None;
            for video in candidates.iter().filter(|v| !used.contains(&v.video_id)) {
                if best.map_or(true, |b| video.engagement() > b.engagement()) {
                    best = Some(video);
                }
            }

            match best {
                Some(video) => {
                    info!("✅ '{}' → {} ({} likes)", topic, video.video_id, video.engagement());
                    used.insert(video.video_id.clone());
                    result.push(video.clone().into_ranked(Some(topic.clone())));
                }
                None => debug!(
                    "No eligible video for '{}' ({} filtered candidates)",
                    topic,
                    candidates.len()
                ),
            }
        }

        if result.len() < max_results {
            let mut leftovers: Vec<&CandidateVideo> = pool
                .iter()
                .filter(|v| !used.contains(&v.video_id) && self.passes_filters(v))
                .collect();
            leftovers.sort_by(|a, b| b.engagement().cmp(&a.engagement()));

            let room = max_results - result.len();
            debug!("Backfilling up to {} slots from {} leftovers", room, leftovers.len());
            result.extend(leftovers.into_iter().take(room).map(|v| v.clone().into_ranked(None)));
        }

        result.truncate(max_results);
        result
    }

    async fn recommend_free_text(&self, text: &str, max_results: usize) -> Vec<CandidateVideo> {
        let mut queries = query_variants(text);
        if queries.is_empty() {
            queries.push(text.to_string());
        }

        let cap = max_results.saturating_mul(self.settings.free_text_cap_multiplier);
        let mut collected = CandidatePool::new();

        self.run_queries(queries, |items| {
            for video in items.into_iter().filter(|v| self.passes_filters(v)) {
                collected.insert(video);
            }
            if collected.len() >= cap {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .await;

        let videos = if collected.is_empty() {
            warn!("No live results for '{}', falling back to curated catalog", text);
            self.curated_candidates(text, max_results)
        } else {
            collected.into_vec()
        };

        self.rank_unmatched(videos, max_results)
    }

    /// Curated lookup for `query`, duration-filtered. When the filter would
    /// remove every curated entry the unfiltered entries are kept.
    fn curated_candidates(&self, query: &str, max_results: usize) -> Vec<CandidateVideo> {
        let videos = self.catalog.lookup(query, max_results.saturating_mul(2));
        let long_enough: Vec<CandidateVideo> = videos
            .iter()
            .filter(|v| v.duration_seconds() >= self.settings.min_duration_seconds)
            .cloned()
            .collect();

        if long_enough.is_empty() {
            videos
        } else {
            long_enough
        }
    }

    /// Dedupe, sort by engagement descending, truncate, and finalize without a matched topic
    fn rank_unmatched(&self, videos: Vec<CandidateVideo>, max_results: usize) -> Vec<CandidateVideo> {
        let mut videos = videos.into_iter().collect::<CandidatePool>().into_vec();
        videos.sort_by(|a, b| b.engagement().cmp(&a.engagement()));
        videos
            .into_iter()
            .take(max_results)
            .map(|v| v.into_ranked(None))
            .collect()
    }
}
