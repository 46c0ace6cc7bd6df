//! Traffic broadcast server
//!
//! Binds the listener, starts the broadcast loop and serves WebSocket
//! connections until the shutdown token is cancelled.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::api::create_router;
use crate::api::websocket::AppState;
use crate::broadcast::BroadcastLoop;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::registry::Registry;

/// A bound, not yet running, traffic server
pub struct TrafficServer {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl TrafficServer {
    /// Build the registry and bind the listener described by `config`
    pub async fn bind(config: &ServerConfig) -> ServerResult<Self> {
        let addr = config.socket_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        let registry = Arc::new(Registry::new());
        let state = Arc::new(AppState::new(registry, CancellationToken::new()));

        Ok(Self { listener, state })
    }

    /// Address actually bound (useful when the configured port is 0)
    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Token that stops the loop and the server when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.state.shutdown.clone()
    }

    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Start broadcasting and serve connections until shutdown
    pub async fn run(self) -> ServerResult<()> {
        let Self { listener, state } = self;
        let shutdown = state.shutdown.clone();

        let broadcast = BroadcastLoop::new(
            Arc::clone(&state.registry),
            Arc::clone(&state.connections),
        );
        let loop_handle = tokio::spawn(broadcast.run(shutdown.clone()));

        tracing::info!(addr = %listener.local_addr()?, "traffic server listening");

        let router = create_router(state);
        let served = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.clone().cancelled_owned())
            .await;

        // Make sure the loop stops even if serving ended on its own
        shutdown.cancel();
        let _ = loop_handle.await;

        served?;
        tracing::info!("traffic server stopped");
        Ok(())
    }
}
