//! Domain-specific error types for the analysis gateway

use serde_json::json;
use thiserror::Error;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Upstream request failed: {message}")]
    Transport { message: String },

    #[error("Upstream returned a non-JSON body: {body}")]
    UpstreamDecode { body: String },

    #[error("Failed to parse embedded pipeline result: {message}")]
    Normalization { message: String },

    #[error("Unrecognized Airia API response format")]
    UnrecognizedFormat { envelope: serde_json::Value },

    #[error("RPC protocol error: {message}")]
    Rpc { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<anyhow::Error> for GatewayError {
    fn from(err: anyhow::Error) -> Self {
        GatewayError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport {
            message: err.to_string(),
        }
    }
}

impl From<rmcp::ErrorData> for GatewayError {
    fn from(err: rmcp::ErrorData) -> Self {
        GatewayError::Rpc {
            message: err.message.to_string(),
        }
    }
}

/// Convert GatewayError to MCP error
impl From<GatewayError> for rmcp::ErrorData {
    fn from(err: GatewayError) -> Self {
        let (code, label, details) = match err {
            GatewayError::Config { message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Configuration error",
                message,
            ),
            GatewayError::Transport { message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Upstream request failed",
                message,
            ),
            GatewayError::UpstreamDecode { body } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Upstream returned a non-JSON body",
                body,
            ),
            GatewayError::Normalization { message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Failed to parse embedded pipeline result",
                message,
            ),
            GatewayError::UnrecognizedFormat { envelope } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Unrecognized Airia API response format",
                envelope.to_string(),
            ),
            GatewayError::Rpc { message } => (
                rmcp::model::ErrorCode::INVALID_PARAMS,
                "RPC protocol error",
                message,
            ),
            GatewayError::Validation { message } => (
                rmcp::model::ErrorCode::INVALID_PARAMS,
                "Validation error",
                message,
            ),
            GatewayError::Internal { message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Internal error",
                message,
            ),
        };

        rmcp::ErrorData {
            code,
            message: format!("{label}: {details}").into(),
            data: Some(json!({ "details": details })),
        }
    }
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
