//! Action cache: last action recorded per event ID.
//!
//! DESIGN
//! ======
//! A plain keyed overwrite store: one record per `eventId`, no ordering,
//! no eviction, nothing survives the process. Shared by every connection
//! task, so the map sits behind a readers-writer lock.
//!
//! The lock is `std::sync::RwLock`, not the tokio one. Every operation is
//! a bounded in-memory map access and no guard is ever held across an
//! `.await`. A poisoned lock is recovered: the map holds whole records, so
//! a panicking writer cannot leave a half-written entry behind.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::action::Action;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("action not in cache: {0}")]
    NotFound(String),
}

/// Concurrency-safe `eventId -> Action` store. Cheap to clone.
#[derive(Clone, Default)]
pub struct ActionCache {
    records: Arc<RwLock<HashMap<String, Action>>>,
}

// =============================================================================
// OPERATIONS
// =============================================================================

impl ActionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the record stored under `action.event_id`.
    pub fn add(&self, action: Action) {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.insert(action.event_id.clone(), action);
    }

    /// Look up the record for `event_id`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::NotFound` when nothing is stored under the key.
    pub fn read(&self, event_id: &str) -> Result<Action, CacheError> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records
            .get(event_id)
            .cloned()
            .ok_or_else(|| CacheError::NotFound(event_id.to_string()))
    }

    /// Delete the record for `event_id`. No-op when absent.
    pub fn remove(&self, event_id: &str) {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.remove(event_id);
    }

    /// Copy of the whole map. Observability only.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, Action> {
        self.records.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[cfg(test)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[cfg(test)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
