//! HTTP surface contract tests, driven through the router with an injected
//! pipeline executor

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

use airia_gateway::config::Config;
use airia_gateway::error::{GatewayError, Result};
use airia_gateway::http::{HttpMetrics, HttpState, build_router};
use airia_gateway::upstream::PipelineExecutor;

struct MockExecutor {
    envelope: Value,
}

#[async_trait]
impl PipelineExecutor for MockExecutor {
    async fn execute(&self, _user_input: &str) -> Result<Value> {
        Ok(self.envelope.clone())
    }
}

struct FailingExecutor;

#[async_trait]
impl PipelineExecutor for FailingExecutor {
    async fn execute(&self, _user_input: &str) -> Result<Value> {
        Err(GatewayError::Transport {
            message: "connection refused".to_string(),
        })
    }
}

fn state_with(upstream: Arc<dyn PipelineExecutor>) -> HttpState {
    HttpState {
        config: Arc::new(Config::default()),
        upstream,
        metrics: Arc::new(Mutex::new(HttpMetrics {
            total_requests: 0,
            last_request_unix: 0,
            errors_total: 0,
            latencies: Vec::new(),
        })),
    }
}

fn analyze_post(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

#[tokio::test]
async fn analyze_returns_the_canonical_result_as_json() {
    // Scenario A end to end on the HTTP surface
    let app = build_router(state_with(Arc::new(MockExecutor {
        envelope: json!({"result": "{\"risk\":\"low\"}"}),
    })));
    let response = app
        .oneshot(analyze_post(r#"{"userInput":"Analyze this contract"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"risk": "low"}));
}

#[tokio::test]
async fn analyze_passes_non_object_results_through_unchanged() {
    let app = build_router(state_with(Arc::new(MockExecutor {
        envelope: json!({"result": "[1,2,3]"}),
    })));
    let response = app.oneshot(analyze_post(r#"{"userInput":"x"}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([1, 2, 3]));
}

#[tokio::test]
async fn analyze_is_strict_about_unparsable_result_strings() {
    // Scenario D, HTTP side: same envelope the RPC surface tolerates
    let app = build_router(state_with(Arc::new(MockExecutor {
        envelope: json!({"result": "not json"}),
    })));
    let response = app.oneshot(analyze_post(r#"{"userInput":"x"}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    let message = body["error"].as_str().expect("error message expected");
    assert!(message.contains("Failed to parse embedded pipeline result"));
}

#[tokio::test]
async fn analyze_reports_unrecognized_envelopes() {
    // Scenario C
    let app = build_router(state_with(Arc::new(MockExecutor {
        envelope: json!({"foo": "bar"}),
    })));
    let response = app.oneshot(analyze_post(r#"{"userInput":"x"}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Unrecognized Airia API response format"})
    );
}

#[tokio::test]
async fn analyze_reports_upstream_failures() {
    let app = build_router(state_with(Arc::new(FailingExecutor)));
    let response = app.oneshot(analyze_post(r#"{"userInput":"x"}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    let message = body["error"].as_str().expect("error message expected");
    assert!(message.contains("connection refused"));
}

#[tokio::test]
async fn analyze_requires_the_user_input_field() {
    let app = build_router(state_with(Arc::new(MockExecutor {
        envelope: json!({"result": "{}"}),
    })));
    let response = app.oneshot(analyze_post(r#"{"wrong":"field"}"#)).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn health_answers_without_auth_or_body() {
    let app = build_router(state_with(Arc::new(FailingExecutor)));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn metrics_track_analyze_requests_and_errors() {
    let state = state_with(Arc::new(FailingExecutor));
    let app = build_router(state.clone());

    let response = app
        .clone()
        .oneshot(analyze_post(r#"{"userInput":"x"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let metrics = body_json(response).await;
    assert_eq!(metrics["total_requests"], json!(1));
    assert_eq!(metrics["errors_total"], json!(1));
}
