//! Client for the Airia pipeline-execution API

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::UpstreamConfig;
use crate::error::{GatewayError, Result};

/// Seam between the transports and the upstream API, so handlers and tests
/// can run against an injected implementation.
#[async_trait]
pub trait PipelineExecutor: Send + Sync {
    /// Execute the pipeline synchronously and return the decoded envelope.
    async fn execute(&self, user_input: &str) -> Result<Value>;
}

/// Wire body for a pipeline execution request.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExecuteRequest<'a> {
    pub user_input: &'a str,
    pub async_output: bool,
}

/// Airia API implementation
pub struct AiriaClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl AiriaClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Internal {
                message: format!("Failed to build reqwest client with timeout: {}", e),
            })?;

        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl PipelineExecutor for AiriaClient {
    async fn execute(&self, user_input: &str) -> Result<Value> {
        // The key is only required once a request actually goes out
        let api_key = self.api_key.as_deref().ok_or_else(|| GatewayError::Config {
            message: "AIRIA_KEY is not set".to_string(),
        })?;

        debug!("Executing Airia pipeline ({} chars)", user_input.len());

        let body = ExecuteRequest {
            user_input,
            async_output: false,
        };

        // Single attempt; failures propagate straight to the caller
        let response = self
            .client
            .post(&self.url)
            .header("X-API-KEY", api_key)
            .json(&body)
            .send()
            .await?;

        info!("Airia response status: {}", response.status());

        // The original decodes the body whatever the status code says
        let text = response.text().await?;
        let envelope: Value =
            serde_json::from_str(&text).map_err(|_| GatewayError::UpstreamDecode { body: text })?;

        debug!("Raw Airia envelope: {}", envelope);
        Ok(envelope)
    }
}
