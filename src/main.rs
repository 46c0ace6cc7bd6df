//! Traffic Broadcast Server - Binary Entry Point
//!
//! This is the main entry point for the traffic-server binary.

use tracing_subscriber::EnvFilter;

use traffic_broadcast::config::ServerConfig;
use traffic_broadcast::error::ServerResult;
use traffic_broadcast::server::TrafficServer;

#[tokio::main]
async fn main() -> ServerResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let server = TrafficServer::bind(&config).await?;

    // Ctrl+C / SIGTERM stops the broadcast loop and drains connections
    let shutdown = server.shutdown_token();
    ctrlc::set_handler(move || shutdown.cancel())?;

    server.run().await
}
