//! Collab registry: join counters per board.
//!
//! DESIGN
//! ======
//! Every `collabChange` records a join against its board. Two numbers come
//! out of one locked mutation:
//! - `board_joins`: how many joins this board has seen;
//! - `distinct_boards`: how many different boards have ever seen a join.
//!
//! The distinct-board count is the historical `joinOrder` value: it couples
//! unrelated boards together, so a second board's first joiner is stamped
//! `2`. It is kept as-is and the per-board count sits next to it.
//! `JoinOrderMode` picks which one goes on the wire.
//!
//! Counters only grow. Nothing is removed for the life of the process.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Which counter is stamped into an outgoing `joinOrder`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JoinOrderMode {
    /// Number of distinct boards ever joined, across the whole process.
    #[default]
    DistinctBoards,
    /// Number of joins recorded against the action's own board.
    PerBoard,
}

/// Counters observed by a single `record_join` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinCounts {
    pub board_joins: u64,
    pub distinct_boards: usize,
}

impl JoinCounts {
    #[must_use]
    pub fn join_order(self, mode: JoinOrderMode) -> i64 {
        let raw = match mode {
            JoinOrderMode::DistinctBoards => u64::try_from(self.distinct_boards).unwrap_or(u64::MAX),
            JoinOrderMode::PerBoard => self.board_joins,
        };
        i64::try_from(raw).unwrap_or(i64::MAX)
    }
}

#[derive(Clone, Default)]
pub struct CollabRegistry {
    /// Board ID -> joins recorded. Key presence is the "board joined" flag.
    boards: Arc<RwLock<HashMap<String, u64>>>,
}

impl CollabRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one join against `board_id` and return both counters as they
    /// stand after the write.
    pub fn record_join(&self, board_id: &str) -> JoinCounts {
        let mut boards = self.boards.write().unwrap_or_else(PoisonError::into_inner);
        let joins = boards.entry(board_id.to_string()).or_insert(0);
        *joins = joins.saturating_add(1);
        let board_joins = *joins;
        JoinCounts { board_joins, distinct_boards: boards.len() }
    }

    /// Joins recorded against `board_id`; zero for an unknown board.
    #[must_use]
    pub fn board_joins(&self, board_id: &str) -> u64 {
        let boards = self.boards.read().unwrap_or_else(PoisonError::into_inner);
        boards.get(board_id).copied().unwrap_or(0)
    }

    /// Number of distinct boards that have recorded at least one join.
    #[must_use]
    pub fn distinct_boards(&self) -> usize {
        self.boards.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
#[path = "collab_test.rs"]
mod tests;
