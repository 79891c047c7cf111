//! Server module containing the GatewayServer implementation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::config::Config;
use crate::error::Result;
use crate::upstream::{AiriaClient, PipelineExecutor};

// Submodules
pub mod router;

/// Arguments of the `analyze` RPC method.
#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    pub user_input: String,
}

/// Flattened pipeline result carried by the RPC response.
#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    pub data: HashMap<String, String>,
}

/// Response of the `analyze` RPC method.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub result: AnalysisResult,
}

/// Main gateway server implementation
#[derive(Clone)]
pub struct GatewayServer {
    pub config: Arc<Config>,
    pub upstream: Arc<dyn PipelineExecutor>,
    /// Bounded RPC worker pool; waiters queue instead of being rejected
    pub rpc_permits: Arc<Semaphore>,
}

impl GatewayServer {
    /// Build the server with the real Airia client.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let upstream = Arc::new(AiriaClient::new(&config.upstream)?);
        Ok(Self::with_executor(config, upstream))
    }

    /// Build the server around an injected executor (used by tests).
    pub fn with_executor(config: Arc<Config>, upstream: Arc<dyn PipelineExecutor>) -> Self {
        let rpc_permits = Arc::new(Semaphore::new(config.runtime.rpc_workers));
        Self {
            config,
            upstream,
            rpc_permits,
        }
    }
}
