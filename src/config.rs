use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::llm::{LLMConfig, LLMProvider};
use crate::video::RelevanceFilter;

/// Configuration for the study video recommender
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Video provider (YouTube Data API) settings
    pub youtube: YouTubeConfig,

    /// LLM settings used for topic extraction
    pub llm: LLMConfig,

    /// Matching and ranking knobs
    pub recommend: RecommendConfig,

    /// Curated fallback catalog settings
    pub catalog: CatalogConfig,

    /// HTTP API settings
    pub server: ServerConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    /// API key; without it every request goes to the curated catalog
    pub api_key: Option<String>,

    /// Search endpoint
    pub search_url: String,

    /// Video details endpoint (duration and statistics)
    pub videos_url: String,

    /// Per-call timeout in seconds
    pub timeout_seconds: u64,

    /// Results requested per query
    pub per_query_limit: usize,

    /// Relevance language hint passed to search
    pub relevance_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    /// Result count when the request does not ask for one
    pub default_max_results: usize,

    /// Ceiling applied to caller-supplied result counts
    pub max_results_limit: usize,

    /// Videos shorter than this are never recommended
    pub min_duration_seconds: u64,

    /// Topics beyond this count are ignored
    pub max_topics: usize,

    /// Stop querying variants for a topic once this many filtered candidates exist
    pub per_topic_candidate_cap: usize,

    /// Free-text accumulation stops at `max_results * free_text_cap_multiplier`
    pub free_text_cap_multiplier: usize,

    /// How many topics to ask the LLM for when deriving them from free text
    pub extracted_topic_count: usize,

    /// Variant queries kept in flight at once (1 = strictly sequential)
    pub fetch_concurrency: usize,

    /// Override of the educational allow-list
    pub allow_terms: Option<Vec<String>>,

    /// Override of the entertainment ban-list
    pub ban_terms: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Extra curated buckets appended after the built-in ones
    pub extra_catalog_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when RUST_LOG is not set
    pub level: String,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            search_url: "https://www.googleapis.com/youtube/v3/search".to_string(),
            videos_url: "https://www.googleapis.com/youtube/v3/videos".to_string(),
            timeout_seconds: 15,
            per_query_limit: 6,
            relevance_language: "en".to_string(),
        }
    }
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            default_max_results: 6,
            max_results_limit: 50,
            min_duration_seconds: 120, // 2 minutes
            max_topics: 8,
            per_topic_candidate_cap: 12,
            free_text_cap_multiplier: 4,
            extracted_topic_count: 5,
            fetch_concurrency: 1,
            allow_terms: None,
            ban_terms: None,
        }
    }
}

impl RecommendConfig {
    /// Relevance filter built from the configured term overrides
    pub fn relevance_filter(&self) -> RelevanceFilter {
        let defaults = RelevanceFilter::default();
        match (&self.allow_terms, &self.ban_terms) {
            (None, None) => defaults,
            (allow, ban) => RelevanceFilter::new(
                allow.clone().unwrap_or_else(|| defaults.allow_terms().to_vec()),
                ban.clone().unwrap_or_else(|| defaults.ban_terms().to_vec()),
            ),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit file, or from the first standard
    /// location that exists, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::from_default_locations(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    fn from_default_locations() -> Self {
        let config_paths = [
            "video-recommender.toml",
            "config/video-recommender.toml",
            "/etc/video-recommender/config.toml",
        ];

        for path in &config_paths {
            let path = Path::new(path);
            if !path.exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!("Failed to load config file {}: {}", path.display(), e),
            }
        }

        tracing::debug!("No configuration file found, using defaults");
        Self::default()
    }

    /// Override settings from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = non_empty("YOUTUBE_API_KEY") {
            self.youtube.api_key = Some(key);
        }

        if let Some(key) = non_empty("GEMINI_API_KEY") {
            self.llm.api_key = Some(key);
        }

        if let Some(provider) = non_empty("LLM_PROVIDER") {
            match provider.parse::<LLMProvider>() {
                Ok(provider) => self.llm.provider = provider,
                Err(e) => tracing::warn!("Ignoring LLM_PROVIDER: {}", e),
            }
        }

        if let Some(model) = non_empty("LLM_MODEL") {
            self.llm.model = model;
        }

        if let Some(endpoint) = non_empty("LLM_ENDPOINT") {
            self.llm.endpoint = Some(endpoint);
        }

        if let Some(host) = non_empty("HOST") {
            self.server.host = host;
        }

        if let Some(port) = non_empty("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }

        if let Some(level) = non_empty("VIDEO_RECOMMENDER_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let recommend = &self.recommend;
        let positive = [
            ("recommend.default_max_results", recommend.default_max_results),
            ("recommend.max_results_limit", recommend.max_results_limit),
            ("recommend.max_topics", recommend.max_topics),
            ("recommend.per_topic_candidate_cap", recommend.per_topic_candidate_cap),
            ("recommend.free_text_cap_multiplier", recommend.free_text_cap_multiplier),
            ("recommend.fetch_concurrency", recommend.fetch_concurrency),
            ("youtube.per_query_limit", self.youtube.per_query_limit),
        ];

        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be greater than 0", name)));
            }
        }

        if recommend.default_max_results > recommend.max_results_limit {
            return Err(ConfigError::Invalid(
                "recommend.default_max_results must not exceed recommend.max_results_limit".to_string(),
            ));
        }

        if self.youtube.timeout_seconds == 0 {
            return Err(ConfigError::Invalid("youtube.timeout_seconds must be greater than 0".to_string()));
        }

        Ok(())
    }

    /// Whether live video search can be used
    pub fn provider_configured(&self) -> bool {
        self.youtube.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Video Recommender Configuration:\n\
            - YouTube API: {}\n\
            - LLM Provider: {:?} ({})\n\
            - Default Results: {}\n\
            - Minimum Duration: {}s\n\
            - Max Topics: {}\n\
            - Fetch Concurrency: {}\n\
            - Server: {}:{}",
            if self.provider_configured() { "configured" } else { "not configured (curated fallback)" },
            self.llm.provider,
            self.llm.model,
            self.recommend.default_max_results,
            self.recommend.min_duration_seconds,
            self.recommend.max_topics,
            self.recommend.fetch_concurrency,
            self.server.host,
            self.server.port,
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_youtube_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.youtube.api_key = Some(api_key.into());
        self
    }

    pub fn with_youtube_endpoints(mut self, search_url: impl Into<String>, videos_url: impl Into<String>) -> Self {
        self.config.youtube.search_url = search_url.into();
        self.config.youtube.videos_url = videos_url.into();
        self
    }

    pub fn with_default_max_results(mut self, max_results: usize) -> Self {
        self.config.recommend.default_max_results = max_results;
        self
    }

    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.config.recommend.fetch_concurrency = concurrency;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.recommend.default_max_results, 6);
        assert_eq!(config.recommend.min_duration_seconds, 120);
        assert_eq!(config.recommend.max_topics, 8);
        assert_eq!(config.recommend.per_topic_candidate_cap, 12);
        assert_eq!(config.youtube.per_query_limit, 6);
        assert!(!config.provider_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_youtube_api_key("yt-key")
            .with_default_max_results(3)
            .with_fetch_concurrency(4)
            .build();

        assert!(config.provider_configured());
        assert_eq!(config.recommend.default_max_results, 3);
        assert_eq!(config.recommend.fetch_concurrency, 4);
    }

    #[test]
    fn test_validation_rejects_zero_caps() {
        let mut config = Config::default();
        config.recommend.max_topics = 0;
        assert!(config.validate().is_err());

        let config = ConfigBuilder::new().with_fetch_concurrency(0).build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("YOUTUBE_API_KEY", "yt"),
            ("GEMINI_API_KEY", "gm"),
            ("PORT", "9001"),
            ("HOST", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.youtube.api_key.as_deref(), Some("yt"));
        assert_eq!(config.llm.api_key.as_deref(), Some("gm"));
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [recommend]
            default_max_results = 4
            ban_terms = ["vlog"]

            [youtube]
            api_key = "abc"
            "#,
        )
        .unwrap();

        assert_eq!(config.recommend.default_max_results, 4);
        assert_eq!(config.recommend.min_duration_seconds, 120);
        assert_eq!(config.youtube.timeout_seconds, 15);
        assert!(config.provider_configured());

        let filter = config.recommend.relevance_filter();
        assert_eq!(filter.ban_terms(), ["vlog".to_string()]);
        assert!(filter.allow_terms().contains(&"tutorial".to_string()));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("video-recommender.toml");

        let config = ConfigBuilder::new().with_port(8123).build();
        config.save(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.server.port, 8123);
    }
}
