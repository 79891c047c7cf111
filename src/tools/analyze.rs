//! analyze tool handler: the RPC front-end of the pipeline gateway

use crate::adapters::to_flat_map;
use crate::error::{GatewayError, Result};
use crate::normalize::{ParsePolicy, normalize};
use crate::server::{AnalysisResult, AnalyzeParams, AnalyzeResponse, GatewayServer};
use rmcp::model::{CallToolRequestParam, CallToolResult};
use serde_json::Value;
use tracing::{error, info};

impl GatewayServer {
    /// Handle the analyze tool call
    pub async fn handle_analyze(&self, request: CallToolRequestParam) -> Result<CallToolResult> {
        // Worker-pool bound: callers past the limit wait here
        let _permit = self
            .rpc_permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| GatewayError::Internal {
                message: format!("RPC worker pool closed: {}", e),
            })?;

        let args = request.arguments.ok_or_else(|| GatewayError::Rpc {
            message: "Missing parameters".into(),
        })?;

        let params: AnalyzeParams =
            serde_json::from_value(Value::Object(args)).map_err(|_| GatewayError::Validation {
                message: "'user_input' parameter is required".into(),
            })?;

        info!("analyze called ({} chars)", params.user_input.len());

        // Detached so peer cancellation doesn't abort the in-flight upstream call
        let upstream = self.upstream.clone();
        let canonical = tokio::spawn(async move {
            let envelope = upstream.execute(&params.user_input).await?;
            // The RPC surface keeps an unparsable result string as literal text
            normalize(&envelope, ParsePolicy::Lenient)
        })
        .await
        .map_err(|e| GatewayError::Internal {
            message: format!("analysis task failed: {}", e),
        })?
        .inspect_err(|e| {
            error!("Server error: {}", e);
        })?;

        let response = AnalyzeResponse {
            result: AnalysisResult {
                data: to_flat_map(&canonical),
            },
        };

        let structured = serde_json::to_value(&response).map_err(|e| GatewayError::Internal {
            message: format!("Failed to encode analyze response: {}", e),
        })?;

        Ok(CallToolResult::structured(structured))
    }
}
