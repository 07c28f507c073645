//! Connection lifecycle: presence on connect and disconnect.
//!
//! LIFECYCLE
//! =========
//! Connect:
//! 1. Mint a session (random identity, cursor at the origin).
//! 2. Register it, collecting every peer that was already live.
//! 3. Greet the newcomer: one `set <id> <x> <y>` per peer, then
//!    `i am <id>` last so the client can tell "others" from "me".
//!
//! Disconnect:
//! 1. Drop the session.
//! 2. `disconnected <id>` to everyone still registered.
//! 3. `{"info": {"ID", "X", "Y"}, "action": "disconnect"}` to the same.
//!
//! The greeting is returned rather than queued so the socket task can
//! write it straight to the wire ahead of any relayed traffic.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::services::session::{ConnectionId, Session, SessionError};
use crate::state::AppState;

pub const DISCONNECT_ACTION: &str = "disconnect";

/// Directed messages owed to a freshly connected client, in send order.
#[derive(Debug, Clone)]
pub struct Greeting {
    pub session: Session,
    pub messages: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "UPPERCASE")]
struct PeerInfo<'a> {
    id: &'a str,
    x: f64,
    y: f64,
}

#[derive(Serialize)]
struct DisconnectNotice<'a> {
    info: PeerInfo<'a>,
    action: &'static str,
}

/// `set <id> <x> <y>` line describing an existing peer.
#[must_use]
pub fn presence_line(session: &Session) -> String {
    format!("set {} {} {}", session.id, session.x, session.y)
}

/// `i am <id>` line telling a client its own identity.
#[must_use]
pub fn identity_line(session: &Session) -> String {
    format!("i am {}", session.id)
}

/// `disconnected <id>` line announcing a departure.
#[must_use]
pub fn departure_line(session: &Session) -> String {
    format!("disconnected {}", session.id)
}

/// Structured departure notice.
///
/// # Errors
///
/// Returns the underlying `serde_json` error if serialization fails.
pub fn departure_notice(session: &Session) -> Result<String, serde_json::Error> {
    serde_json::to_string(&DisconnectNotice {
        info: PeerInfo { id: &session.id, x: session.x, y: session.y },
        action: DISCONNECT_ACTION,
    })
}

/// Register a new connection and build its greeting.
pub async fn connect(state: &AppState, conn_id: ConnectionId, tx: mpsc::Sender<String>) -> Greeting {
    let session = Session::new();
    let peers = state.sessions.register(conn_id, session.clone(), tx).await;

    let mut messages: Vec<String> = peers.iter().map(presence_line).collect();
    messages.push(identity_line(&session));

    info!(%conn_id, session_id = %session.id, peers = peers.len(), "lifecycle: client connected");
    Greeting { session, messages }
}

/// Drop the session and announce the departure to the remaining clients.
///
/// The session leaves the registry before anything is broadcast. Removal
/// and registration share the registry's write lock, so a client that
/// connects concurrently either was registered first and hears both
/// notices, or registers afterwards and never sees the leaver at all.
///
/// # Errors
///
/// Returns `SessionError::UnknownConnection` if the connection never went
/// through `connect`. Nothing is broadcast in that case.
pub async fn disconnect(state: &AppState, conn_id: ConnectionId) -> Result<Session, SessionError> {
    let session = state
        .sessions
        .remove(conn_id)
        .await
        .ok_or(SessionError::UnknownConnection(conn_id))?;

    state.sessions.broadcast_all(&departure_line(&session)).await;
    match departure_notice(&session) {
        Ok(notice) => {
            state.sessions.broadcast_all(&notice).await;
        }
        Err(e) => warn!(%conn_id, error = %e, "lifecycle: failed to encode disconnect notice"),
    }

    info!(%conn_id, session_id = %session.id, "lifecycle: client disconnected");
    Ok(session)
}

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod tests;
