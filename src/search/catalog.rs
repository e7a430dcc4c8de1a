/// Curated fallback catalog used when live search is unavailable or empty
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::ConfigError;
use crate::video::CandidateVideo;

/// A topic keyword and its hand-picked videos
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogBucket {
    pub keyword: String,
    #[serde(default)]
    pub videos: Vec<CandidateVideo>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "bucket")]
    buckets: Vec<CatalogBucket>,
}

/// Read-only, ordered keyword → videos mapping
#[derive(Debug, Clone, PartialEq)]
pub struct CuratedCatalog {
    buckets: Vec<CatalogBucket>,
}

static BUILTIN: Lazy<CuratedCatalog> = Lazy::new(|| CuratedCatalog {
    buckets: vec![
        CatalogBucket {
            keyword: "machine learning".to_string(),
            videos: vec![
                curated(
                    "GwIo3gDZCVQ",
                    "Machine Learning by Andrew Ng (full course)",
                    "Stanford",
                    "PT2H30M",
                    "1200000",
                ),
                curated(
                    "Gv9_4yMHFhI",
                    "Intro to Machine Learning - Crash Course",
                    "CrashCourse",
                    "PT12M",
                    "350000",
                ),
            ],
        },
        CatalogBucket {
            keyword: "neural networks".to_string(),
            videos: vec![curated(
                "aircAruvnKk",
                "Neural Networks Explained in 20 Minutes",
                "AI Simplified",
                "PT20M15S",
                "850000",
            )],
        },
    ],
});

fn curated(id: &str, title: &str, channel: &str, duration: &str, views: &str) -> CandidateVideo {
    let mut video = CandidateVideo::new(id)
        .with_title(title)
        .with_duration(duration)
        .with_like_count(0);
    video.channel_title = Some(channel.to_string());
    video.thumbnail = Some(format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", id));
    video.view_count = Some(serde_json::Value::String(views.to_string()));
    video
}

impl CuratedCatalog {
    /// The built-in catalog
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn new(buckets: Vec<CatalogBucket>) -> Self {
        Self { buckets }
    }

    /// Built-in catalog with buckets from a TOML file appended after it
    pub async fn with_extra_file(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let file: CatalogFile = toml::from_str(&content)?;

        let mut catalog = Self::builtin();
        let added = file.buckets.len();
        catalog.buckets.extend(
            file.buckets
                .into_iter()
                .filter(|b| !b.keyword.trim().is_empty())
                .map(|mut b| {
                    b.keyword = b.keyword.trim().to_lowercase();
                    b.videos.retain(CandidateVideo::has_id);
                    b
                }),
        );

        info!("📚 Loaded {} curated buckets from: {}", added, path.display());
        Ok(catalog)
    }

    pub fn buckets(&self) -> &[CatalogBucket] {
        &self.buckets
    }

    /// Look up curated videos using the thread-local RNG for shuffling
    pub fn lookup(&self, query: &str, count: usize) -> Vec<CandidateVideo> {
        self.lookup_with_rng(query, count, &mut rand::rng())
    }

    /// Look up curated videos for a query.
    ///
    /// A non-blank query returns the first bucket whose keyword is a
    /// substring of the case-folded query. Blank or unmatched queries merge
    /// every bucket, shuffle, and truncate to `count`.
    pub fn lookup_with_rng<R: Rng + ?Sized>(&self, query: &str, count: usize, rng: &mut R) -> Vec<CandidateVideo> {
        let query = query.trim().to_lowercase();

        if !query.is_empty() {
            if let Some(bucket) = self.buckets.iter().find(|b| query.contains(b.keyword.as_str())) {
                return bucket.videos.iter().take(count).cloned().collect();
            }
        }

        let mut merged: Vec<CandidateVideo> = self
            .buckets
            .iter()
            .flat_map(|b| b.videos.iter().cloned())
            .collect();
        merged.shuffle(rng);
        merged.truncate(count);
        merged
    }
}

impl Default for CuratedCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
