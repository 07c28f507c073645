//! Session registry: live connections and their presence.
//!
//! ARCHITECTURE
//! ============
//! Each websocket connection gets a `ConnectionId` from the transport and a
//! `Session` (public identity + cursor position) from the lifecycle
//! handler. The registry maps one to the other and keeps the connection's
//! outbound channel next to it, so it doubles as the fan-out primitive:
//! directed send, broadcast to all, broadcast to all but one.
//!
//! DELIVERY
//! ========
//! Sends use `try_send`. A recipient whose queue is full or whose task has
//! already gone away is skipped and the loop moves on; one slow or dead
//! client never blocks delivery to the rest.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tracing::debug;
use uuid::Uuid;

/// Transport-level handle for one socket.
pub type ConnectionId = Uuid;

// =============================================================================
// TYPES
// =============================================================================

/// Public identity and cursor position of a connected client.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

impl Session {
    /// Fresh session with a random identity at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self { id: Uuid::new_v4().to_string(), x: 0.0, y: 0.0 }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no session registered for connection {0}")]
    UnknownConnection(ConnectionId),
}

struct Entry {
    session: Session,
    tx: mpsc::Sender<String>,
}

/// Live sessions keyed by connection. Cheap to clone.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    entries: Arc<RwLock<HashMap<ConnectionId, Entry>>>,
}

// =============================================================================
// MEMBERSHIP
// =============================================================================

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session and return every other session that was live at
    /// that instant. Listing and inserting happen under one write lock, so
    /// two clients connecting at once always see each other exactly once
    /// between them.
    pub async fn register(&self, conn_id: ConnectionId, session: Session, tx: mpsc::Sender<String>) -> Vec<Session> {
        let mut entries = self.entries.write().await;
        let peers = entries.values().map(|e| e.session.clone()).collect();
        entries.insert(conn_id, Entry { session, tx });
        peers
    }

    /// Drop a connection's session. Returns it if it was registered.
    pub async fn remove(&self, conn_id: ConnectionId) -> Option<Session> {
        self.entries.write().await.remove(&conn_id).map(|e| e.session)
    }

    /// Session attached to a connection.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownConnection` if the connection never
    /// registered or has already been removed.
    pub async fn get(&self, conn_id: ConnectionId) -> Result<Session, SessionError> {
        self.entries
            .read()
            .await
            .get(&conn_id)
            .map(|e| e.session.clone())
            .ok_or(SessionError::UnknownConnection(conn_id))
    }

    /// All live connections with their sessions.
    pub async fn list(&self) -> Vec<(ConnectionId, Session)> {
        self.entries
            .read()
            .await
            .iter()
            .map(|(id, e)| (*id, e.session.clone()))
            .collect()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    // =========================================================================
    // DELIVERY
    // =========================================================================

    /// Send to one connection. Returns whether the message was queued.
    pub async fn send(&self, conn_id: ConnectionId, text: &str) -> bool {
        let entries = self.entries.read().await;
        entries
            .get(&conn_id)
            .is_some_and(|e| e.tx.try_send(text.to_string()).is_ok())
    }

    /// Send to every connection. Returns the number of recipients reached.
    pub async fn broadcast_all(&self, text: &str) -> usize {
        self.fan_out(text, None).await
    }

    /// Send to every connection except `exclude`. Returns the number of
    /// recipients reached.
    pub async fn broadcast_except(&self, text: &str, exclude: ConnectionId) -> usize {
        self.fan_out(text, Some(exclude)).await
    }

    async fn fan_out(&self, text: &str, exclude: Option<ConnectionId>) -> usize {
        let entries = self.entries.read().await;
        let mut delivered = 0;
        for (conn_id, entry) in entries.iter() {
            if exclude == Some(*conn_id) {
                continue;
            }
            match entry.tx.try_send(text.to_string()) {
                Ok(()) => delivered += 1,
                Err(e) => debug!(%conn_id, error = %e, "session: skipped recipient"),
            }
        }
        delivered
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
