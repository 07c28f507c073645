//! Domain services used by the websocket route.
//!
//! ARCHITECTURE
//! ============
//! Service modules own presence, routing, and shared in-memory state so the
//! route handler can stay focused on socket plumbing.

pub mod cache;
pub mod collab;
pub mod dispatch;
pub mod lifecycle;
pub mod session;
