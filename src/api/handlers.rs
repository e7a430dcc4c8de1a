//! API request handlers

use serde_json::Value;
use tracing::info;

use super::models::{HealthStatus, RecommendResponse};
use crate::config::Config;
use crate::recommend::{RecommendRequest, Recommender};

/// Handle health check requests
pub fn health_check(config: &Config) -> HealthStatus {
    HealthStatus {
        status: "healthy".to_string(),
        service: "study-video-recommender".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        provider_configured: config.provider_configured(),
    }
}

/// Parse a request body. `null` means an empty request; anything other than
/// a JSON object is rejected. Mistyped fields inside an object are ignored
/// field by field.
pub fn parse_request(payload: Value) -> Result<RecommendRequest, String> {
    match payload {
        Value::Null => Ok(RecommendRequest::default()),
        Value::Object(_) => serde_json::from_value(payload).map_err(|e| format!("Invalid request body: {}", e)),
        _ => Err("Request body must be a JSON object".to_string()),
    }
}

/// Handle a recommendation request
pub async fn recommend_videos(recommender: &Recommender, request: RecommendRequest) -> RecommendResponse {
    info!(
        "📥 Recommendation request: {} topics, query={:?}, max_results={:?}",
        request.topics().len(),
        request.free_text(),
        request.max_results
    );

    RecommendResponse {
        videos: recommender.recommend(&request).await,
    }
}
