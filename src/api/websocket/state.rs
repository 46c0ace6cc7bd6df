//! WebSocket application state and connection set

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::broadcast::{Client, ClientRegistry};
use crate::error::SendError;
use crate::registry::Registry;

/// Lifecycle of a WebSocket connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ConnectionState::Connecting,
            1 => ConnectionState::Open,
            2 => ConnectionState::Closing,
            _ => ConnectionState::Closed,
        }
    }
}

/// One connected WebSocket client
///
/// Outbound text is pushed onto an unbounded queue drained by the
/// connection's writer task, so `send` never waits on the network.
pub struct WsClient {
    id: u64,
    state: AtomicU8,
    tx: mpsc::UnboundedSender<Arc<str>>,
}

impl WsClient {
    fn new(id: u64, tx: mpsc::UnboundedSender<Arc<str>>) -> Self {
        Self {
            id,
            state: AtomicU8::new(ConnectionState::Connecting as u8),
            tx,
        }
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn set_state(&self, state: ConnectionState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }
}

impl Client for WsClient {
    fn id(&self) -> u64 {
        self.id
    }

    fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    fn send(&self, text: Arc<str>) -> Result<(), SendError> {
        self.tx.send(text).map_err(|_| SendError::Closed(self.id))
    }
}

/// Live set of connections, mutated only by the connection handler
#[derive(Default)]
pub struct ConnectionSet {
    clients: RwLock<HashMap<u64, Arc<WsClient>>>,
    next_id: AtomicU64,
}

impl ConnectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new connection in the connecting state
    pub fn register(&self, tx: mpsc::UnboundedSender<Arc<str>>) -> Arc<WsClient> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let client = Arc::new(WsClient::new(id, tx));
        self.clients.write().insert(id, Arc::clone(&client));
        client
    }

    /// Drop a connection and mark it closed
    pub fn remove(&self, id: u64) -> Option<Arc<WsClient>> {
        let removed = self.clients.write().remove(&id);
        if let Some(client) = &removed {
            client.set_state(ConnectionState::Closed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.clients.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.read().is_empty()
    }
}

impl ClientRegistry for ConnectionSet {
    fn list_clients(&self) -> Vec<Arc<dyn Client>> {
        self.clients
            .read()
            .values()
            .map(|c| Arc::clone(c) as Arc<dyn Client>)
            .collect()
    }
}

/// Shared application state for WebSocket connections
pub struct AppState {
    /// Road and camera ids reported in every snapshot
    pub registry: Arc<Registry>,

    /// Connections the broadcast loop fans out to
    pub connections: Arc<ConnectionSet>,

    /// Cancelled when the server is shutting down
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, shutdown: CancellationToken) -> Self {
        Self {
            registry,
            connections: Arc::new(ConnectionSet::new()),
            shutdown,
        }
    }

    pub fn client_count(&self) -> usize {
        self.connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::fan_out;

    #[test]
    fn test_register_assigns_unique_ids() {
        let set = ConnectionSet::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let a = set.register(tx.clone());
        let b = set.register(tx);

        assert_ne!(a.id(), b.id());
        assert_eq!(set.len(), 2);
        assert_eq!(a.state(), ConnectionState::Connecting);
        assert!(!a.is_open());
    }

    #[test]
    fn test_remove_marks_closed() {
        let set = ConnectionSet::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let client = set.register(tx);

        set.remove(client.id());

        assert!(set.is_empty());
        assert_eq!(client.state(), ConnectionState::Closed);
        assert!(set.remove(client.id()).is_none());
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let set = ConnectionSet::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let client = set.register(tx);
        drop(rx);

        assert_eq!(client.send("x".into()), Err(SendError::Closed(client.id())));
    }

    #[tokio::test]
    async fn test_fan_out_only_reaches_open_connections() {
        let set = ConnectionSet::new();
        let (open_tx, mut open_rx) = mpsc::unbounded_channel();
        let (pending_tx, mut pending_rx) = mpsc::unbounded_channel();

        let open = set.register(open_tx);
        open.set_state(ConnectionState::Open);
        let _pending = set.register(pending_tx);

        let report = fan_out(&set, Arc::from("snapshot"));

        assert_eq!(report.delivered, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(&*open_rx.recv().await.unwrap(), "snapshot");
        assert!(pending_rx.try_recv().is_err());
    }

    #[test]
    fn test_app_state_starts_empty() {
        let state = AppState::new(Arc::new(Registry::new()), CancellationToken::new());
        assert_eq!(state.client_count(), 0);
        assert_eq!(state.registry.road_ids().len(), 42);
    }
}
