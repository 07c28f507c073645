//! Message dispatch: route inbound actions by type.
//!
//! DESIGN
//! ======
//! `route` is the business logic: it decodes nothing and sends nothing. It
//! takes a decoded action, applies the per-type state changes (join stamp,
//! optional cache write), and returns an `Outcome` naming the payload and
//! who should get it. `handle_message` owns the outbound side: decode,
//! route, fan out.
//!
//! | type                          | state change        | fan-out        |
//! |-------------------------------|---------------------|----------------|
//! | `updateSingleDrawingPosition` | -                   | all but sender |
//! | `rtMousePosition`             | -                   | all but sender |
//! | `collabChange`                | join + `joinOrder`  | everyone       |
//! | anything else                 | -                   | everyone       |
//!
//! Malformed input is not rejected. It goes down the default row as the
//! zero action, so the sender hears back an empty action rather than an
//! error frame.

use tracing::{debug, warn};

use crate::action::{self, Action, ActionKind, Decoded, Fanout};
use crate::services::session::ConnectionId;
use crate::state::AppState;

/// What to send and to whom, for one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub kind: ActionKind,
    pub fanout: Fanout,
    pub action: Action,
    pub payload: String,
    /// Whether the action was written to the cache.
    pub cached: bool,
}

/// Apply per-type handling and encode the outgoing action.
///
/// # Errors
///
/// Returns the `serde_json` error if the outgoing action fails to encode.
pub fn route(state: &AppState, decoded: Decoded) -> Result<Outcome, serde_json::Error> {
    let malformed = decoded.is_malformed();
    let mut action = decoded.into_action();

    // Malformed input always takes the default branch.
    let kind = if malformed { ActionKind::Other } else { action.kind() };

    if kind == ActionKind::CollabChange {
        let counts = state.collabs.record_join(&action.board_id);
        action.join_order = counts.join_order(state.config.join_order);
        debug!(board_id = %action.board_id, ?counts, join_order = action.join_order, "dispatch: join recorded");
    }

    let cached = !malformed && state.config.cache_policy.caches(kind);
    if cached {
        remember(state, &action);
    }

    let payload = action::encode(&action)?;
    Ok(Outcome { kind, fanout: kind.fanout(), action, payload, cached })
}

/// Write an action into the cache under its event ID.
pub fn remember(state: &AppState, action: &Action) {
    state.cache.add(action.clone());
}

/// Decode, route, and fan out one inbound message from `conn_id`.
///
/// Returns the outcome, or `None` if encoding failed and nothing was sent.
pub async fn handle_message(state: &AppState, conn_id: ConnectionId, raw: &[u8]) -> Option<Outcome> {
    let decoded = action::decode(raw);
    if let Decoded::Malformed { reason } = &decoded {
        warn!(%conn_id, %reason, "dispatch: malformed action, relaying as empty");
    }

    let outcome = match route(state, decoded) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(%conn_id, error = %e, "dispatch: failed to encode action");
            return None;
        }
    };

    let delivered = match outcome.fanout {
        Fanout::All => state.sessions.broadcast_all(&outcome.payload).await,
        Fanout::ExceptSender => state.sessions.broadcast_except(&outcome.payload, conn_id).await,
    };

    debug!(
        %conn_id,
        kind = ?outcome.kind,
        board_id = %outcome.action.board_id,
        event_id = %outcome.action.event_id,
        delivered,
        cached = outcome.cached,
        "dispatch: relayed action"
    );
    if tracing::enabled!(tracing::Level::DEBUG) {
        debug!(cache = ?state.cache.snapshot(), "dispatch: cache contents");
    }

    Some(outcome)
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod tests;
