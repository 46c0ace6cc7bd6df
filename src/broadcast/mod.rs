//! Periodic fan-out of traffic snapshots
//!
//! The broadcast loop depends only on the capability traits defined here,
//! not on a concrete transport. The WebSocket layer in [`crate::api`]
//! provides the production implementation; tests plug in in-memory clients.

mod ticker;

use std::sync::Arc;

use crate::error::SendError;

pub use ticker::{fan_out, BroadcastLoop, LoopState, LoopStatus, TickReport, TICK_INTERVAL};

/// A connected client as seen by the broadcast loop
pub trait Client: Send + Sync {
    /// Transport-assigned connection id
    fn id(&self) -> u64;

    /// Whether the connection is fully open and can take messages
    fn is_open(&self) -> bool;

    /// Queue a text message for delivery without waiting for it to be written
    fn send(&self, text: Arc<str>) -> Result<(), SendError>;
}

/// Read access to the transport's live connection set
pub trait ClientRegistry: Send + Sync {
    /// Current connections in any lifecycle state
    fn list_clients(&self) -> Vec<Arc<dyn Client>>;
}
