//! HTTP surface for the recommender
//!
//! Exposes `POST /api/recommend_videos` plus health checks.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::recommend::Recommender;

pub mod handlers;
pub mod models;
pub mod server;

pub use server::{build_router, AppState};

/// API server wrapping a shared recommender
pub struct ApiServer {
    recommender: Arc<Recommender>,
    config: Arc<Config>,
}

impl ApiServer {
    pub fn new(recommender: Arc<Recommender>, config: Arc<Config>) -> Self {
        Self { recommender, config }
    }

    /// Start the API server and run until it stops
    pub async fn start(self) -> Result<()> {
        info!("🚀 Starting API server on port {}", self.config.server.port);
        server::start_http_server(self.recommender, self.config).await
    }
}
