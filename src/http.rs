//! HTTP transport module for the analysis gateway
//!
//! Axum-based server exposing the JSON analyze endpoint plus health and
//! metrics. The RPC surface is also mounted here (MCP over Streamable HTTP)
//! when the gateway runs in http transport mode.

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager,
    tower::{StreamableHttpServerConfig, StreamableHttpService},
};
use serde::Deserialize;
use serde_json::json;
use std::{cmp::Ordering, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error};

use crate::adapters::to_json;
use crate::config::Config;
use crate::error::Result;
use crate::normalize::{ParsePolicy, normalize};
use crate::server::GatewayServer;
use crate::upstream::PipelineExecutor;

/// Shared state for HTTP server
#[derive(Clone)]
pub struct HttpState {
    pub config: Arc<Config>,
    pub upstream: Arc<dyn PipelineExecutor>,
    pub metrics: Arc<Mutex<HttpMetrics>>,
}

/// Metrics for HTTP server
#[derive(Debug, Clone)]
pub struct HttpMetrics {
    pub total_requests: u64,
    pub last_request_unix: u64,
    pub errors_total: u64,
    pub latencies: Vec<f64>, // ring buffer for p95
}

impl HttpMetrics {
    fn new() -> Self {
        Self {
            total_requests: 0,
            last_request_unix: std::time::SystemTime::UNIX_EPOCH
                .elapsed()
                .unwrap_or_default()
                .as_secs(),
            errors_total: 0,
            latencies: Vec::with_capacity(256),
        }
    }
}

/// Request body of the analyze endpoint
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequestBody {
    #[serde(rename = "userInput")]
    pub user_input: String,
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

/// Metrics endpoint
pub async fn metrics_handler(State(state): State<HttpState>) -> impl IntoResponse {
    let metrics = state.metrics.lock().await.clone();

    let (avg_latency_ms, p95_latency_ms) = if metrics.latencies.is_empty() {
        (None, None)
    } else {
        let sum: f64 = metrics.latencies.iter().sum();
        let avg = sum / metrics.latencies.len() as f64;
        let mut sorted = metrics.latencies.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let p95_idx = (sorted.len() as f64 * 0.95) as usize;
        let p95 = sorted.get(p95_idx).copied();
        (Some(avg), p95)
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        json!({
            "metrics_version": "1",
            "total_requests": metrics.total_requests,
            "last_request_unix": metrics.last_request_unix,
            "errors_total": metrics.errors_total,
            "avg_latency_ms": avg_latency_ms,
            "p95_latency_ms": p95_latency_ms
        })
        .to_string(),
    )
}

/// Analyze endpoint: forward to the pipeline, normalize strictly, pass the
/// canonical result through as JSON
pub async fn analyze_handler(
    State(state): State<HttpState>,
    Json(body): Json<AnalyzeRequestBody>,
) -> axum::response::Response {
    debug!("Received input: {}", body.user_input);

    // Detached so a dropped connection doesn't cancel the in-flight upstream call
    let upstream = state.upstream.clone();
    let outcome = match tokio::spawn(async move {
        let envelope = upstream.execute(&body.user_input).await?;
        // The HTTP surface re-raises embedded parse failures
        normalize(&envelope, ParsePolicy::Strict)
    })
    .await
    {
        Ok(outcome) => outcome,
        Err(e) => Err(crate::error::GatewayError::Internal {
            message: format!("analysis task failed: {}", e),
        }),
    };

    match outcome {
        Ok(canonical) => (StatusCode::OK, Json(to_json(&canonical))).into_response(),
        Err(err) => {
            error!("Server error: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

/// Build the JSON router for the gateway's HTTP surface
pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/analyze", post(analyze_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            track_analyze_requests,
        ))
        .with_state(state)
}

async fn track_analyze_requests(
    State(metrics): State<Arc<Mutex<HttpMetrics>>>,
    req: axum::http::Request<Body>,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let start = (req.uri().path() == "/analyze").then(std::time::Instant::now);
    let resp = next.run(req).await;
    if let Some(start_time) = start {
        let latency_ms = start_time.elapsed().as_millis() as f64;
        let mut m = metrics.lock().await;
        if latency_ms > 0.0 {
            m.latencies.push(latency_ms);
            if m.latencies.len() > 256 {
                m.latencies.remove(0);
            }
        }
        if !resp.status().is_success() {
            m.errors_total = m.errors_total.saturating_add(1);
        }
        m.total_requests = m.total_requests.saturating_add(1);
        m.last_request_unix = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
    }
    resp
}

/// Start the HTTP server
pub async fn start_http_server(server: GatewayServer) -> Result<()> {
    let state = HttpState {
        config: server.config.clone(),
        upstream: server.upstream.clone(),
        metrics: Arc::new(Mutex::new(HttpMetrics::new())),
    };

    // Mount the RPC surface (MCP over Streamable HTTP) beside the JSON routes
    let session_mgr = Arc::new(LocalSessionManager::default());
    let path = server.config.runtime.http_path.clone();
    let keepalive = Duration::from_secs(server.config.runtime.http_sse_keepalive_sec);
    let server_factory = server.clone();
    let mcp_service: StreamableHttpService<GatewayServer, _> = StreamableHttpService::new(
        move || Ok(server_factory.clone()),
        session_mgr.clone(),
        StreamableHttpServerConfig {
            stateful_mode: true,
            sse_keep_alive: Some(keepalive),
            ..Default::default()
        },
    );

    let app = build_router(state).nest_service(path.as_str(), mcp_service);

    let listener = tokio::net::TcpListener::bind(server.config.runtime.http_bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP listener: {}", e))?;

    tracing::info!(
        "Starting HTTP server on {} (RPC at {})",
        server.config.runtime.http_bind,
        server.config.runtime.http_path
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}
