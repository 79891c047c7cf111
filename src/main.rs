use airia_gateway::{config::Config, http, server::GatewayServer};
use anyhow::Result;
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration using the typed config system
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    // Initialize tracing with configurable log level
    tracing_subscriber::fmt()
        .with_env_filter(config.runtime.log_level.as_str())
        .with_ansi(false)
        .init();

    info!(
        "Starting Airia analysis gateway (upstream={}, transport={})",
        config.upstream.url, config.runtime.transport
    );

    let server = GatewayServer::new(Arc::new(config)).map_err(|e| {
        eprintln!("Failed to create server: {}", e);
        e
    })?;

    match server.config.runtime.transport.as_str() {
        "http" => {
            http::start_http_server(server).await?;
        }
        _ => {
            // Default: RPC surface over stdio
            let service = server.serve(stdio()).await.map_err(|e| {
                eprintln!("Failed to start RPC service: {}", e);
                e
            })?;
            info!("RPC server ready - waiting for requests");
            service.waiting().await?;
        }
    }

    Ok(())
}
