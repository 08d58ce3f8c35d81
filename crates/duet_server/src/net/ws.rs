//! WebSocket connection handling.
//!
//! Each upgraded socket gets a connection id, an outbound channel drained
//! by a writer task, and a read loop that parses inbound frames and calls
//! into the room manager. Messages from one connection are handled in
//! arrival order; closing the socket is the only cancellation and always
//! ends in a `disconnect` call so the seat is freed.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use duet_protocol::ClientMessage;

use super::AppState;
use crate::rooms::ConnectionHandle;

/// Upgrade handler for `GET /ws`.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = state.next_connection_id();
    info!(connection = conn_id, "client connected");

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = ConnectionHandle::new(conn_id, tx);

    // Writer task: drain the outbound channel into the socket. Exits when
    // the channel closes or the peer stops accepting frames; either way
    // subsequent sends to this connection drop silently.
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    warn!(connection = conn_id, "failed to encode message: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(frame)) = stream.next().await {
        match frame {
            Message::Text(text) => match ClientMessage::parse(&text) {
                Ok(msg) => dispatch(&state, &handle, msg).await,
                // Protocol noise: log, drop, keep the connection open.
                Err(e) => debug!(connection = conn_id, "ignoring unparsable frame: {}", e),
            },
            Message::Close(_) => break,
            // Binary frames are not part of the protocol; pings are
            // answered by axum itself.
            _ => {}
        }
    }

    state.rooms.disconnect(conn_id).await;
    writer.abort();
    info!(connection = conn_id, "client disconnected");
}

async fn dispatch(state: &AppState, handle: &ConnectionHandle, msg: ClientMessage) {
    let conn_id = handle.id();
    match msg {
        ClientMessage::JoinRoom { room_code, name } => {
            state.rooms.join(handle.clone(), &room_code, &name).await;
        }
        ClientMessage::PlayerReady => {
            state.rooms.set_ready(conn_id).await;
        }
        ClientMessage::StartGame => {
            state.rooms.start(conn_id).await;
        }
        ClientMessage::MakeChoice {
            scene_id,
            choice_index,
            choice_text,
            next_scene_id,
            status,
        } => {
            state
                .rooms
                .make_choice(
                    conn_id,
                    scene_id,
                    choice_index,
                    &choice_text,
                    next_scene_id,
                    status,
                )
                .await;
        }
    }
}
