//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::{handlers, models::ErrorBody};
use crate::config::Config;
use crate::recommend::Recommender;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub config: Arc<Config>,
}

/// Build the router with all routes and middleware attached
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        // Health check endpoints (both paths for compatibility)
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))
        .route("/api/recommend_videos", post(recommend_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Configure and start the HTTP server
pub async fn start_http_server(recommender: Arc<Recommender>, config: Arc<Config>) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(AppState { recommender, config });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🌐 API server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(handlers::health_check(&state.config)))
}

async fn recommend_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(body)) => match handlers::parse_request(body) {
            Ok(request) => {
                let response = handlers::recommend_videos(&state.recommender, request).await;
                (StatusCode::OK, Json(response)).into_response()
            }
            Err(message) => {
                warn!("Rejected recommendation request: {}", message);
                (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorBody::new(message))).into_response()
            }
        },
        Err(rejection) => {
            warn!("Rejected recommendation request: {}", rejection.body_text());
            (rejection.status(), Json(ErrorBody::new(rejection.body_text()))).into_response()
        }
    }
}
