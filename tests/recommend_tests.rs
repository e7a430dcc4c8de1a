use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use study_video_recommender::config::RecommendConfig;
use study_video_recommender::{
    CandidateVideo, CuratedCatalog, ProviderError, RecommendRequest, Recommender, TopicExtractor, VideoProvider,
};

/// Provider that answers from a fixed query → response script and records every call
#[derive(Default)]
struct ScriptedProvider {
    configured: bool,
    responses: HashMap<String, Result<Vec<CandidateVideo>, u16>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn configured() -> Self {
        Self {
            configured: true,
            ..Self::default()
        }
    }

    fn unconfigured() -> Self {
        Self::default()
    }

    fn respond(mut self, query: &str, videos: Vec<CandidateVideo>) -> Self {
        self.responses.insert(query.to_string(), Ok(videos));
        self
    }

    fn fail(mut self, query: &str, status: u16) -> Self {
        self.responses.insert(query.to_string(), Err(status));
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoProvider for ScriptedProvider {
    async fn search(&self, query: &str, _limit: usize) -> Result<Vec<CandidateVideo>, ProviderError> {
        self.calls.lock().unwrap().push(query.to_string());
        match self.responses.get(query) {
            Some(Ok(videos)) => Ok(videos.clone()),
            Some(Err(status)) => Err(ProviderError::Status {
                status: *status,
                body: "scripted failure".to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

struct FixedTopics(Vec<String>);

#[async_trait]
impl TopicExtractor for FixedTopics {
    async fn extract(&self, _text: &str, max_topics: usize) -> Vec<String> {
        self.0.iter().take(max_topics).cloned().collect()
    }
}

fn lesson(id: &str, likes: u64) -> CandidateVideo {
    CandidateVideo::new(id)
        .with_title(format!("{} tutorial", id))
        .with_duration("PT10M")
        .with_like_count(likes)
}

fn recommender(provider: Arc<ScriptedProvider>) -> Recommender {
    recommender_with(provider, RecommendConfig::default())
}

fn recommender_with(provider: Arc<ScriptedProvider>, settings: RecommendConfig) -> Recommender {
    Recommender::new(provider, Arc::new(CuratedCatalog::builtin()), settings)
}

fn ids(videos: &[CandidateVideo]) -> Vec<&str> {
    videos.iter().map(|v| v.video_id.as_str()).collect()
}

fn topics(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

#[tokio::test]
async fn test_best_match_then_backfill_by_engagement() {
    let provider = Arc::new(ScriptedProvider::configured().respond(
        "neural networks tutorial",
        vec![lesson("a", 10), lesson("b", 50), lesson("c", 5), lesson("d", 20)],
    ));
    let engine = recommender(provider);

    let videos = engine.recommend_for(&topics(&["neural networks"]), None, 3).await;

    assert_eq!(ids(&videos), vec!["b", "d", "a"]);
    assert_eq!(videos[0].matched_keyword.as_deref(), Some("neural networks"));
    assert!(videos[1].matched_keyword.is_none());
    assert!(videos[2].matched_keyword.is_none());
    assert_eq!(videos[0].url.as_deref(), Some("https://www.youtube.com/watch?v=b"));
}

#[tokio::test]
async fn test_concurrent_fetching_keeps_results_identical() {
    let script = || {
        ScriptedProvider::configured()
            .respond("graphs tutorial", vec![lesson("g1", 3), lesson("g2", 9)])
            .respond("graphs lecture", vec![lesson("g3", 9), lesson("g4", 1)])
            .respond("trees explained", vec![lesson("t1", 7)])
    };
    let settings = RecommendConfig {
        fetch_concurrency: 4,
        ..RecommendConfig::default()
    };

    let sequential = recommender(Arc::new(script()))
        .recommend_for(&topics(&["graphs", "trees"]), None, 4)
        .await;
    let concurrent = recommender_with(Arc::new(script()), settings)
        .recommend_for(&topics(&["graphs", "trees"]), None, 4)
        .await;

    assert_eq!(sequential, concurrent);
    // g2 and g3 tie; the first encountered wins
    assert_eq!(ids(&sequential), vec!["g2", "t1", "g3", "g1"]);
}

#[tokio::test]
async fn test_unconfigured_provider_uses_curated_bucket() {
    let provider = Arc::new(ScriptedProvider::unconfigured());
    let engine = recommender(provider.clone());

    let videos = engine.recommend_for(&topics(&["machine learning"]), None, 6).await;

    let returned: HashSet<&str> = ids(&videos).into_iter().collect();
    assert_eq!(returned, HashSet::from(["GwIo3gDZCVQ", "Gv9_4yMHFhI"]));
    assert!(videos.iter().all(|v| v.matched_keyword.is_none()));
    assert!(videos.windows(2).all(|w| w[0].engagement() >= w[1].engagement()));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_video_is_never_assigned_twice() {
    let provider = Arc::new(
        ScriptedProvider::configured()
            .respond("graphs tutorial", vec![lesson("shared", 100), lesson("g", 10)])
            .respond("trees tutorial", vec![lesson("shared", 100), lesson("t", 5)]),
    );
    let engine = recommender(provider);

    let videos = engine.recommend_for(&topics(&["graphs", "trees"]), None, 2).await;

    assert_eq!(ids(&videos), vec!["shared", "t"]);
    assert_eq!(videos[0].matched_keyword.as_deref(), Some("graphs"));
    assert_eq!(videos[1].matched_keyword.as_deref(), Some("trees"));
}

#[tokio::test]
async fn test_later_topic_left_unmatched_when_its_only_video_is_taken() {
    let provider = Arc::new(
        ScriptedProvider::configured()
            .respond("graphs tutorial", vec![lesson("shared", 100)])
            .respond("trees tutorial", vec![lesson("shared", 100)]),
    );
    let engine = recommender(provider);

    let videos = engine.recommend_for(&topics(&["graphs", "trees"]), None, 3).await;

    assert_eq!(ids(&videos), vec!["shared"]);
    assert_eq!(videos[0].matched_keyword.as_deref(), Some("graphs"));
}

#[tokio::test]
async fn test_unmatched_topic_keeps_slot_for_backfill() {
    let provider = Arc::new(
        ScriptedProvider::configured()
            .respond("graphs tutorial", vec![lesson("shared", 100), lesson("spare", 1)])
            .respond("trees tutorial", vec![lesson("shared", 100)]),
    );
    let engine = recommender(provider);

    let videos = engine.recommend_for(&topics(&["graphs", "trees"]), None, 3).await;

    assert_eq!(ids(&videos), vec!["shared", "spare"]);
    assert_eq!(videos[0].matched_keyword.as_deref(), Some("graphs"));
    assert!(videos[1].matched_keyword.is_none());
}

#[tokio::test]
async fn test_unconfigured_lookup_ignores_topics_beyond_limit() {
    let provider = Arc::new(ScriptedProvider::unconfigured());
    let engine = recommender(provider);
    let mut many: Vec<String> = (0..8).map(|i| format!("subject{}", i)).collect();
    many.push("neural networks".to_string());

    let videos = engine.recommend_for(&many, None, 6).await;

    // No bucket keyword among the first eight topics: every curated video is eligible
    let returned: HashSet<&str> = ids(&videos).into_iter().collect();
    assert_eq!(returned, HashSet::from(["GwIo3gDZCVQ", "Gv9_4yMHFhI", "aircAruvnKk"]));
}

#[tokio::test]
async fn test_matched_entries_follow_topic_order() {
    let provider = Arc::new(
        ScriptedProvider::configured()
            .respond("calculus tutorial", vec![lesson("calc", 1)])
            .respond("algebra tutorial", vec![lesson("alg", 500)])
            .respond("geometry tutorial", vec![lesson("geo", 50)]),
    );
    let engine = recommender(provider);

    let videos = engine
        .recommend_for(&topics(&["Calculus", "Algebra", "Geometry"]), None, 3)
        .await;

    let matched: Vec<_> = videos.iter().map(|v| v.matched_keyword.as_deref()).collect();
    assert_eq!(matched, vec![Some("Calculus"), Some("Algebra"), Some("Geometry")]);
    assert_eq!(ids(&videos), vec!["calc", "alg", "geo"]);
}

#[tokio::test]
async fn test_output_ids_are_unique() {
    let provider = Arc::new(
        ScriptedProvider::configured()
            .respond("sorting tutorial", vec![lesson("x", 5), lesson("y", 4)])
            .respond("sorting explained", vec![lesson("x", 5), lesson("y", 4), lesson("z", 3)])
            .respond("sorting lecture", vec![lesson("z", 3)]),
    );
    let engine = recommender(provider);

    let videos = engine.recommend_for(&topics(&["sorting"]), None, 10).await;

    assert_eq!(ids(&videos), vec!["x", "y", "z"]);
}

#[tokio::test]
async fn test_minimum_duration_boundary() {
    let too_short = lesson("short", 1000).with_duration("PT1M59S");
    let just_enough = lesson("enough", 1).with_duration("PT2M");
    let provider = Arc::new(ScriptedProvider::configured().respond("sorting tutorial", vec![too_short, just_enough]));
    let engine = recommender(provider);

    let videos = engine.recommend_for(&topics(&["sorting"]), None, 5).await;

    assert_eq!(ids(&videos), vec!["enough"]);
}

#[tokio::test]
async fn test_banned_terms_always_excluded() {
    let shorts = CandidateVideo::new("clip")
        .with_title("Sorting tutorial in 60 seconds #shorts")
        .with_duration("PT10M")
        .with_like_count(9000);
    let provider =
        Arc::new(ScriptedProvider::configured().respond("sorting tutorial", vec![shorts, lesson("real", 2)]));
    let engine = recommender(provider);

    let videos = engine.recommend_for(&topics(&["sorting"]), None, 5).await;

    assert_eq!(ids(&videos), vec!["real"]);
}

#[tokio::test]
async fn test_failed_query_is_skipped() {
    let provider = Arc::new(
        ScriptedProvider::configured()
            .fail("biology tutorial", 500)
            .respond("biology explained", vec![lesson("cell", 12)]),
    );
    let engine = recommender(provider.clone());

    let videos = engine.recommend_for(&topics(&["biology"]), None, 3).await;

    assert_eq!(ids(&videos), vec!["cell"]);
    assert_eq!(videos[0].matched_keyword.as_deref(), Some("biology"));
    assert_eq!(provider.calls().len(), 7);
}

#[tokio::test]
async fn test_topic_cap_stops_variant_queries() {
    let batch: Vec<CandidateVideo> = (0..12).map(|i| lesson(&format!("v{}", i), i)).collect();
    let provider = Arc::new(ScriptedProvider::configured().respond("chemistry tutorial", batch));
    let engine = recommender(provider.clone());

    let videos = engine.recommend_for(&topics(&["chemistry"]), None, 1).await;

    assert_eq!(ids(&videos), vec!["v11"]);
    assert_eq!(provider.calls(), vec!["chemistry tutorial"]);
}

#[tokio::test]
async fn test_topics_beyond_limit_are_ignored() {
    let provider = Arc::new(ScriptedProvider::configured());
    let engine = recommender(provider.clone());
    let many: Vec<String> = (0..10).map(|i| format!("topic{}", i)).collect();

    let videos = engine.recommend_for(&many, None, 6).await;

    assert!(videos.is_empty());
    let calls = provider.calls();
    assert_eq!(calls.len(), 8 * 7);
    assert!(calls.iter().all(|q| !q.starts_with("topic8") && !q.starts_with("topic9")));
}

#[tokio::test]
async fn test_free_text_ranks_by_engagement() {
    let provider = Arc::new(
        ScriptedProvider::configured()
            .respond("quantum physics tutorial", vec![lesson("q1", 3), lesson("q2", 30)])
            .respond("quantum physics explained", vec![lesson("q3", 300), lesson("q1", 3)]),
    );
    let engine = recommender(provider);

    let videos = engine.recommend(&RecommendRequest::for_query("Quantum Physics").with_max_results(2)).await;

    assert_eq!(ids(&videos), vec!["q3", "q2"]);
    assert!(videos.iter().all(|v| v.matched_keyword.is_none()));
}

#[tokio::test]
async fn test_free_text_stops_at_soft_cap() {
    let batch: Vec<CandidateVideo> = (0..4).map(|i| lesson(&format!("f{}", i), i)).collect();
    let provider = Arc::new(ScriptedProvider::configured().respond("optics tutorial", batch));
    let engine = recommender(provider.clone());

    let videos = engine.recommend_for(&[], Some("optics"), 1).await;

    assert_eq!(ids(&videos), vec!["f3"]);
    assert_eq!(provider.calls(), vec!["optics tutorial"]);
}

#[tokio::test]
async fn test_free_text_falls_back_to_catalog() {
    let provider = Arc::new(ScriptedProvider::configured());
    let engine = recommender(provider.clone());

    let videos = engine.recommend_for(&[], Some("intro to neural networks"), 3).await;

    assert_eq!(ids(&videos), vec!["aircAruvnKk"]);
    assert!(videos[0].matched_keyword.is_none());
    assert!(!provider.calls().is_empty());
}

#[tokio::test]
async fn test_derived_topics_drive_per_topic_mode() {
    let provider = Arc::new(ScriptedProvider::configured().respond("graphs tutorial", vec![lesson("bfs", 8)]));
    let engine = recommender(provider).with_topic_extractor(Arc::new(FixedTopics(topics(&["graphs"]))));

    let videos = engine
        .recommend(&RecommendRequest::for_query("Notes about BFS and DFS over graphs"))
        .await;

    assert_eq!(ids(&videos), vec!["bfs"]);
    assert_eq!(videos[0].matched_keyword.as_deref(), Some("graphs"));
}

#[tokio::test]
async fn test_empty_request_returns_curated_picks() {
    let provider = Arc::new(ScriptedProvider::configured());
    let engine = recommender(provider.clone());

    let videos = engine.recommend(&RecommendRequest::default().with_max_results(2)).await;

    let curated: HashSet<String> = CuratedCatalog::builtin()
        .buckets()
        .iter()
        .flat_map(|b| b.videos.iter().map(|v| v.video_id.clone()))
        .collect();
    assert_eq!(videos.len(), 2);
    assert!(videos.iter().all(|v| curated.contains(&v.video_id)));
    assert!(videos.iter().all(|v| v.matched_keyword.is_none()));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_key_points_used_when_topics_missing() {
    let provider = Arc::new(ScriptedProvider::configured().respond("enzymes tutorial", vec![lesson("enz", 4)]));
    let engine = recommender(provider);
    let request: RecommendRequest = serde_json::from_value(serde_json::json!({
        "key_points": ["Enzymes"],
        "max_results": "1"
    }))
    .unwrap();

    let videos = engine.recommend(&request).await;

    assert_eq!(ids(&videos), vec!["enz"]);
    assert_eq!(videos[0].matched_keyword.as_deref(), Some("Enzymes"));
}
