//! WebSocket connection handler

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use super::state::{AppState, ConnectionState};
use crate::broadcast::Client;
use crate::generator::initial_snapshot;

/// How long a closing connection may take to flush its close frame
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Encode the all-online snapshot for a newly joined client
fn initial_message(state: &AppState) -> Option<Arc<str>> {
    let snapshot = initial_snapshot(&state.registry, &mut rand::rng());
    match snapshot.to_json() {
        Ok(json) => Some(json.into()),
        Err(e) => {
            tracing::warn!(error = %e, "failed to encode initial snapshot");
            None
        }
    }
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sink, mut stream) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<Arc<str>>();

    let client = state.connections.register(tx);
    let client_id = client.id();
    tracing::info!(client_id, clients = state.client_count(), "client connected");

    // Queued before the client is marked open so it always arrives first
    if let Some(text) = initial_message(&state) {
        let _ = client.send(text);
    }
    client.set_state(ConnectionState::Open);

    let closing = CancellationToken::new();
    let mut writer = tokio::spawn(write_loop(sink, rx, closing.clone()));
    let mut writer_done = false;

    loop {
        tokio::select! {
            result = stream.next() => {
                match result {
                    Some(Ok(msg)) => {
                        if !handle_client_message(client_id, msg) {
                            break; // Client requested close
                        }
                    }
                    Some(Err(e)) => {
                        tracing::debug!(client_id, error = %e, "websocket error");
                        break;
                    }
                    None => break, // Client disconnected
                }
            }

            _ = &mut writer => {
                writer_done = true; // Outbound side failed
                break;
            }

            _ = state.shutdown.cancelled() => break,
        }
    }

    client.set_state(ConnectionState::Closing);
    state.connections.remove(client_id);

    if !writer_done {
        closing.cancel();
        if timeout(CLOSE_TIMEOUT, &mut writer).await.is_err() {
            tracing::debug!(client_id, "close handshake timed out");
            writer.abort();
        }
    }

    tracing::info!(client_id, clients = state.client_count(), "client disconnected");
}

/// Forward queued snapshots to the socket until `closing` is cancelled
///
/// Ends with a close frame (going away) so clients see an orderly
/// shutdown rather than a reset.
async fn write_loop<S>(
    mut sink: S,
    mut rx: mpsc::UnboundedReceiver<Arc<str>>,
    closing: CancellationToken,
) where
    S: Sink<Message> + Unpin,
{
    loop {
        tokio::select! {
            biased;

            _ = closing.cancelled() => break,

            next = rx.recv() => {
                let Some(text) = next else { break };
                if sink.send(Message::Text(text.to_string())).await.is_err() {
                    return; // Client disconnected
                }
            }
        }
    }

    let frame = CloseFrame {
        code: close_code::AWAY,
        reason: Cow::from("server closing connection"),
    };
    let _ = sink.send(Message::Close(Some(frame))).await;
}

/// Handle a message from the client
///
/// Inbound messages carry no commands; they are logged and discarded.
/// Returns false if the connection should be closed.
fn handle_client_message(client_id: u64, msg: Message) -> bool {
    match msg {
        Message::Text(text) => {
            tracing::debug!(client_id, message = %text, "received client message");
            true
        }
        Message::Binary(data) => {
            tracing::debug!(client_id, bytes = data.len(), "received binary client message");
            true
        }
        Message::Ping(_) | Message::Pong(_) => true, // Answered by the protocol layer
        Message::Close(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::types::TrafficSnapshot;
    use futures::channel::mpsc as sink_channel;

    #[test]
    fn test_initial_message_has_all_cameras_online() {
        let state = AppState::new(Arc::new(Registry::new()), CancellationToken::new());
        let text = initial_message(&state).unwrap();
        let snapshot: TrafficSnapshot = serde_json::from_str(&text).unwrap();

        assert_eq!(snapshot.roads.len(), 42);
        assert_eq!(snapshot.online_camera_count(), 440);
    }

    #[test]
    fn test_client_messages_keep_connection_open() {
        assert!(handle_client_message(0, Message::Text("hello".to_string())));
        assert!(handle_client_message(0, Message::Binary(vec![1, 2, 3])));
        assert!(handle_client_message(0, Message::Ping(vec![])));
        assert!(!handle_client_message(0, Message::Close(None)));
    }

    #[tokio::test]
    async fn test_write_loop_forwards_then_sends_close_frame() {
        let (sink, mut sent) = sink_channel::channel::<Message>(16);
        let (tx, rx) = mpsc::unbounded_channel::<Arc<str>>();
        let closing = CancellationToken::new();
        let writer = tokio::spawn(write_loop(sink, rx, closing.clone()));

        tx.send(Arc::from("snapshot")).unwrap();
        assert_eq!(sent.next().await, Some(Message::Text("snapshot".to_string())));

        closing.cancel();
        writer.await.unwrap();

        match sent.next().await {
            Some(Message::Close(Some(frame))) => assert_eq!(frame.code, close_code::AWAY),
            other => panic!("expected close frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_write_loop_closes_when_queue_dropped() {
        let (sink, mut sent) = sink_channel::channel::<Message>(16);
        let (tx, rx) = mpsc::unbounded_channel::<Arc<str>>();
        drop(tx);

        write_loop(sink, rx, CancellationToken::new()).await;

        assert!(matches!(sent.next().await, Some(Message::Close(Some(_)))));
    }
}
