pub mod health;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tracing::warn;

use crate::errors::AppError;
use crate::matching::handlers;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}

pub fn build_router(state: AppState) -> Router {
    let cors = build_cors(&state.config.allowed_origins);

    Router::new()
        .route("/", get(health::home_handler))
        .route("/health", get(health::health_handler))
        // Match API
        .route("/api/match", post(handlers::handle_match))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

/// Allow-listed origins with credentials. Methods and headers mirror the request,
/// since credentialed CORS cannot use the `*` wildcard.
fn build_cors(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::matching::semantic::TermFrequencyEncoder;
    use crate::matching::{MatchScorer, ScoringConfig};

    fn test_state() -> AppState {
        let config = Config::from_lookup(|_| None).unwrap();
        let scorer = MatchScorer::new(ScoringConfig::default(), Arc::new(TermFrequencyEncoder));
        AppState {
            config,
            scorer: Arc::new(scorer),
        }
    }

    async fn post_match(body: Value) -> (StatusCode, Value) {
        post_raw(body.to_string()).await
    }

    async fn post_raw(body: String) -> (StatusCode, Value) {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/match")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_match_returns_score_fields() {
        let (status, body) = post_match(json!({
            "resume": "Built Rust services on Kafka, cut latency 30%",
            "job_description": "Rust engineer with Kafka experience; reduce latency 20%"
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        for field in [
            "final_match_percentage",
            "semantic_score",
            "skill_overlap_score",
            "impact_score",
            "matched_skills",
            "missing_keywords",
        ] {
            assert!(body.get(field).is_some(), "missing {field} in {body}");
        }
        assert_eq!(body["impact_score"], 100.0);
    }

    #[tokio::test]
    async fn test_match_empty_input_is_400_with_detail() {
        let (status, body) = post_match(json!({
            "resume": "   ",
            "job_description": "Rust engineer"
        }))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Inputs cannot be empty");
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_match_malformed_json_has_detail() {
        let (status, body) = post_raw("{\"resume\": ".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string(), "no detail in {body}");
        assert_eq!(body["error"]["code"], "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_match_missing_field_has_detail() {
        let (status, body) = post_match(json!({ "resume": "Rust engineer" })).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(
            body["detail"].as_str().unwrap().contains("job_description"),
            "unexpected detail in {body}"
        );
    }

    #[tokio::test]
    async fn test_home_banner() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_reports_encoder() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["encoder"], "term_frequency");
        assert_eq!(body["scoring"]["keyword_limit"], 20);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_listed_origin() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/match")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn test_cors_rejects_unlisted_origin() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/match")
                    .header(header::ORIGIN, "https://evil.example")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
