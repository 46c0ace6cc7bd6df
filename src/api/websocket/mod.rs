//! WebSocket module for real-time traffic updates
//!
//! Provides the WebSocket endpoint (`/` and `/ws`) that streams traffic
//! snapshots to connected clients.
//!
//! ## Behavior
//! - On connect, a snapshot with every camera online is sent to the new client
//! - Every tick, the broadcast loop sends a fresh snapshot to each open connection
//! - Inbound client messages are logged and otherwise ignored

pub mod handler;
pub mod state;

// Re-export commonly used items
pub use state::{AppState, ConnectionSet, ConnectionState, WsClient};
