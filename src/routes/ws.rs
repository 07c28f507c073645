//! WebSocket handler: per-connection relay loop.
//!
//! DESIGN
//! ======
//! On upgrade, mints a connection ID and enters a `select!` loop:
//! - Incoming client messages → dispatch (decode, route, fan out)
//! - Relayed messages from peers → forward to client
//!
//! One task per socket. Messages from one client are dispatched in the
//! order they arrive; different clients run concurrently.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → register session → write greeting (`set ...`*, `i am ...`)
//! 2. Client messages → `dispatch::handle_message`
//! 3. Close or socket error → announce departure → drop session

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::services::session::ConnectionId;
use crate::services::{dispatch, lifecycle};
use crate::state::AppState;

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let conn_id: ConnectionId = Uuid::new_v4();

    // Per-connection channel for messages relayed from peers.
    let (client_tx, mut client_rx) = mpsc::channel::<String>(state.config.client_channel_capacity);

    let greeting = lifecycle::connect(&state, conn_id, client_tx).await;
    if send_all(&mut socket, greeting.messages).await.is_ok() {
        relay(&mut socket, &state, conn_id, &mut client_rx).await;
    }

    if let Err(e) = lifecycle::disconnect(&state, conn_id).await {
        warn!(%conn_id, error = %e, "ws: disconnect without session");
    }
}

/// Pump the socket until the client goes away.
async fn relay(socket: &mut WebSocket, state: &AppState, conn_id: ConnectionId, client_rx: &mut mpsc::Receiver<String>) {
    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        dispatch::handle_message(state, conn_id, text.as_str().as_bytes()).await;
                    }
                    Message::Binary(bytes) => {
                        dispatch::handle_message(state, conn_id, &bytes).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(text) = client_rx.recv() => {
                if send_text(socket, text).await.is_err() {
                    break;
                }
            }
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_all(socket: &mut WebSocket, messages: Vec<String>) -> Result<(), axum::Error> {
    for text in messages {
        send_text(socket, text).await?;
    }
    Ok(())
}

async fn send_text(socket: &mut WebSocket, text: String) -> Result<(), axum::Error> {
    socket.send(Message::Text(text.into())).await.inspect_err(|e| {
        debug!(error = %e, "ws: send failed");
    })
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
