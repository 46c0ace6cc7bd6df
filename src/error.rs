//! Error types for the traffic broadcast server

use thiserror::Error;

/// Result type for startup and serving operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors raised while configuring, starting or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("failed to encode snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// Failure to hand a message to one client
///
/// Never fatal to the broadcast loop; the client is skipped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    #[error("client {0} is closed")]
    Closed(u64),
}
