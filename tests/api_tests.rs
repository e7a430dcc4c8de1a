#![cfg(feature = "api")]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use study_video_recommender::api::{build_router, AppState};
use study_video_recommender::{ConfigBuilder, Recommender};

async fn app() -> axum::Router {
    // No API key: every request is answered from the curated catalog
    let config = ConfigBuilder::new().build();
    let recommender = Recommender::from_config(&config).await.unwrap();
    build_router(AppState {
        recommender: Arc::new(recommender),
        config: Arc::new(config),
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoints() {
    for uri in ["/health", "/api/health"] {
        let response = app()
            .await
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["provider_configured"], false);
    }
}

#[tokio::test]
async fn test_recommend_videos_from_catalog() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/recommend_videos")
        .header("content-type", "application/json")
        .body(Body::from(json!({"key_topics": ["Machine Learning"], "max_results": 5}).to_string()))
        .unwrap();

    let response = app().await.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let videos = body["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 2);
    for video in videos {
        assert!(video["matched_keyword"].is_null());
        assert!(video["url"].as_str().unwrap().starts_with("https://www.youtube.com/watch?v="));
    }
}

#[tokio::test]
async fn test_invalid_json_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/recommend_videos")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app().await.oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
    let body = body_json(response).await;
    assert!(body["error"].is_string());
}

async fn post_recommend(body: String) -> axum::response::Response {
    let request = Request::builder()
        .method("POST")
        .uri("/api/recommend_videos")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app().await.oneshot(request).await.unwrap()
}

#[tokio::test]
async fn test_mistyped_query_keeps_topics() {
    let response =
        post_recommend(json!({"key_topics": ["Neural Networks"], "query": 42, "max_results": 6}).to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let ids: Vec<&str> = body["videos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["videoId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["aircAruvnKk"]);
}

#[tokio::test]
async fn test_non_object_body_is_rejected() {
    let response = post_recommend(json!(["neural networks"]).to_string()).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("JSON object"));
}
