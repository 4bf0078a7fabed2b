//! WebSocket connection handlers.
//!
//! This is the transport side of the relay: it assigns connection ids, decodes
//! frames into inbound events, drains each connection's outbound channel into
//! its socket, and reports the disconnect exactly once.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionId, InboundEvent, OutboundEvent},
    infrastructure::dto::websocket::{ClientMessage, ServerMessage},
    ui::state::AppState,
    usecase::SessionError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();

    // Create a channel for this connection to receive outbound events
    let (tx, rx) = mpsc::unbounded_channel();
    if let Err(e) = state.coordinator.on_connect(connection_id.clone(), tx).await {
        tracing::warn!("Rejected connection '{}': {}", connection_id, e);
        return;
    }

    let (mut sender, receiver) = socket.split();

    // Tell the client its own id so it can apply the offer tie-break
    let hello = ServerMessage::Connected {
        connection_id: connection_id.to_string(),
    };
    let greeted = match hello.to_json() {
        Ok(json) => sender.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::error!("Failed to encode connected frame: {}", e);
            false
        }
    };

    if greeted {
        let mut send_task = pusher_loop(rx, sender);
        let mut recv_task = receiver_loop(receiver, state.clone(), connection_id.clone());

        // If any one of the tasks completes, abort the other
        tokio::select! {
            _ = &mut recv_task => send_task.abort(),
            _ = &mut send_task => recv_task.abort(),
        };
    } else {
        tracing::warn!("Could not greet connection '{}'", connection_id);
    }

    match state.coordinator.on_disconnect(&connection_id).await {
        Ok(summary) => {
            tracing::info!(
                "Connection '{}' cleaned up (room: {}, room closed: {})",
                connection_id,
                summary
                    .room_id
                    .as_ref()
                    .map_or("-", |room_id| room_id.as_str()),
                summary.room_closed
            );
        }
        Err(e) => {
            tracing::warn!("Failed to clean up connection '{}': {}", connection_id, e);
        }
    }
}

/// Spawns a task that drains the connection's outbound channel into its socket.
///
/// Ends when the channel closes or the socket stops accepting writes.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<OutboundEvent>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match ServerMessage::from(event).to_json() {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to encode outbound event: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Spawns a task that decodes frames from the socket and hands them to the coordinator.
///
/// Frames are processed one at a time, so events from one connection reach the
/// coordinator in the order they were sent.
fn receiver_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    connection_id: ConnectionId,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_text_frame(&state, &connection_id, text.as_str()).await;
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                // Ping/pong is handled by the WebSocket protocol; binary frames are not part of it
                _ => {}
            }
        }
    })
}

async fn handle_text_frame(state: &AppState, connection_id: &ConnectionId, text: &str) {
    let event: InboundEvent = match ClientMessage::from_json(text) {
        Ok(message) => message.into(),
        Err(e) => {
            tracing::warn!("Dropped malformed frame from '{}': {}", connection_id, e);
            return;
        }
    };
    let name = event.name();

    match state.coordinator.handle(connection_id, event).await {
        Ok(()) => {}
        Err(SessionError::UnknownRecipient(to)) => {
            tracing::debug!(
                "Dropped signal from '{}': recipient '{}' is gone",
                connection_id,
                to
            );
        }
        Err(e) => {
            tracing::warn!("Dropped '{}' from '{}': {}", name, connection_id, e);
        }
    }
}
