use serde::{Deserialize, Serialize};

/// Default Airia pipeline-execution endpoint; override with AIRIA_URL.
pub const DEFAULT_AIRIA_URL: &str =
    "https://api.airia.ai/v2/PipelineExecution/b9791679-a12b-4cf4-b1e0-23534346baa6";

/// Main configuration structure loaded from gateway.toml and environment variables
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub upstream: UpstreamConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Upstream pipeline API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    pub url: String,
    pub timeout_secs: u64,
    /// Secret; never read from the toml file, only from AIRIA_KEY.
    /// Absence is surfaced as a Config error on the first upstream call.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_AIRIA_URL.to_string(),
            timeout_secs: 30,
            api_key: None,
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_level: String,
    /// "stdio" serves the RPC surface on stdin/stdout; "http" serves both
    /// surfaces on http_bind (JSON routes + RPC mounted at http_path).
    pub transport: String,
    pub http_bind: std::net::SocketAddr,
    pub http_path: String,
    pub http_sse_keepalive_sec: u64,
    pub rpc_workers: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "airia_gateway=info,rmcp=info".to_string(),
            transport: "stdio".to_string(),
            http_bind: "127.0.0.1:8787"
                .parse()
                .expect("default bind address should parse"),
            http_path: "/mcp".to_string(),
            http_sse_keepalive_sec: 15,
            rpc_workers: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream: UpstreamConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses GATEWAY_CONFIG environment variable or defaults to "gateway.toml"
    pub fn load() -> anyhow::Result<Self> {
        // Load environment variables with smart fallbacks:
        // 1) GATEWAY_ENV_FILE if set
        // 2) ./.env
        // 3) ../.env (repo root when running from crate dir)
        if let Ok(env_path) = std::env::var("GATEWAY_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
            if std::env::var("AIRIA_KEY").is_err() {
                let _ = dotenvy::from_path("../.env");
            }
        }

        let config_path =
            std::env::var("GATEWAY_CONFIG").unwrap_or_else(|_| "gateway.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            toml::from_str(&content)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        // Apply env overrides for the upstream endpoint (env-first)
        if let Ok(url) = std::env::var("AIRIA_URL") {
            config.upstream.url = url;
        }
        if let Some(timeout) = std::env::var("AIRIA_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.upstream.timeout_secs = timeout;
        }
        config.upstream.api_key = std::env::var("AIRIA_KEY").ok();

        config.runtime = RuntimeConfig::load_from_env();

        if !config.upstream.url.starts_with("http://")
            && !config.upstream.url.starts_with("https://")
        {
            tracing::warn!(
                "Upstream URL '{}' doesn't start with http:// or https://",
                config.upstream.url
            );
        }

        // Zero-second timeouts hang forever in reqwest; clamp to the default
        if config.upstream.timeout_secs == 0 {
            tracing::warn!("AIRIA_TIMEOUT_SECS of 0 is not usable, clamping to 30");
            config.upstream.timeout_secs = 30;
        }

        Ok(config)
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(level) = std::env::var("GATEWAY_LOG_LEVEL") {
            cfg.log_level = level;
        }
        if let Ok(transport) = std::env::var("GATEWAY_TRANSPORT") {
            cfg.transport = transport;
        }
        if let Some(bind) = std::env::var("GATEWAY_HTTP_BIND")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            cfg.http_bind = bind;
        }
        if let Ok(path) = std::env::var("GATEWAY_HTTP_PATH") {
            cfg.http_path = path;
        }
        if let Some(keepalive) = std::env::var("GATEWAY_HTTP_SSE_KEEPALIVE_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            cfg.http_sse_keepalive_sec = keepalive;
        }
        if let Some(workers) = std::env::var("GATEWAY_RPC_WORKERS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            cfg.rpc_workers = workers;
        }

        cfg
    }
}
