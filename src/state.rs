//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor and
//! cloned into every connection task. It holds the live session registry,
//! the action cache, the collab join counters, and the parsed config. All
//! of them are process-wide and shared; none outlive the process.

use std::sync::Arc;

use crate::config::Config;
use crate::services::cache::ActionCache;
use crate::services::collab::CollabRegistry;
use crate::services::session::SessionRegistry;

/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionRegistry,
    pub cache: ActionCache,
    pub collabs: CollabRegistry,
    pub config: Arc<Config>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            sessions: SessionRegistry::new(),
            cache: ActionCache::new(),
            collabs: CollabRegistry::new(),
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
