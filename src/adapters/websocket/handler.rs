//! WebSocket upgrade handler for the live event feed.
//!
//! Connection lifecycle:
//! 1. Upgrade to WebSocket and register with the connection registry
//! 2. Send the hello frame
//! 3. Pump broadcast frames to the client until disconnect
//! 4. Remove the connection from the registry
//!
//! Client-to-server traffic is keepalive only; anything else is ignored.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};

use crate::adapters::http::AppState;
use crate::fanout::{ClientId, ClientMessage, ConnectionRegistry, ServerMessage};

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /api/live`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.registry.clone()))
}

/// Runs for the lifetime of one connection.
async fn handle_socket(socket: WebSocket, registry: Arc<ConnectionRegistry>) {
    let (mut sender, mut receiver) = socket.split();

    let client_id = ClientId::new();
    let mut frames = registry.add(client_id).await;
    tracing::debug!(client_id = %client_id, "live client connected");

    // Hello frame; a failure here means the client disconnected immediately.
    let hello = ServerMessage::connected(&client_id).to_frame();
    if sender
        .send(Message::Text(hello.as_ref().to_owned()))
        .await
        .is_err()
    {
        registry.remove(&client_id).await;
        return;
    }

    // Forward broadcast frames to the client. Ends when the registry drops
    // this connection or the socket write fails; dropping `frames` is what
    // surfaces the failure to the broadcaster.
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            if sender
                .send(Message::Text(frame.as_ref().to_owned()))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    // Drain inbound traffic. Only keepalive pings are meaningful.
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    if let Ok(ClientMessage::Ping) = serde_json::from_str::<ClientMessage>(&text) {
                        tracing::trace!("received keepalive ping");
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {
                    // Protocol ping/pong handled by axum; binary ignored.
                }
                Err(_) => break,
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    registry.remove(&client_id).await;
    tracing::debug!(client_id = %client_id, "live client disconnected");
}
