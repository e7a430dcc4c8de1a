//! API data models

use serde::{Deserialize, Serialize};

use crate::video::CandidateVideo;

/// Response body for `POST /api/recommend_videos`
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub videos: Vec<CandidateVideo>,
}

/// Health check payload
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub provider_configured: bool,
}

/// Error body returned for rejected requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}
