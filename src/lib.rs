//! Real-time collaboration hub for a shared drawing board.
//!
//! ARCHITECTURE
//! ============
//! Clients hold one websocket each. The hub assigns every connection a
//! public identity, tells newcomers who is already present, relays drawing
//! and cursor actions by type, and announces departures. All state lives in
//! memory for the life of the process.

pub mod action;
pub mod config;
pub mod routes;
pub mod services;
pub mod state;
