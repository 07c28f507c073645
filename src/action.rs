//! Action: the wire message relayed between board clients.
//!
//! ARCHITECTURE
//! ============
//! Clients send JSON actions over the socket. The server decodes each one,
//! routes it by `type`, optionally stamps server-owned fields, and
//! re-encodes it for fan-out. The server never inspects geometry; `coords`
//! and `mousePosition` pass through untouched.
//!
//! DESIGN
//! ======
//! - Every field defaults to its zero value, so partial payloads decode.
//! - `joinOrder` is server-populated: whatever the client sent is skipped
//!   at decode time, whatever its type.
//! - `coords` accepts `null`, short arrays and `null` points; the gaps
//!   are zero-filled.
//! - Decoding never errors to the caller. Garbage input becomes
//!   `Decoded::Malformed`, which the dispatcher treats as an empty action.

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// TYPE NAMES
// =============================================================================

pub const UPDATE_SINGLE_DRAWING_POSITION: &str = "updateSingleDrawingPosition";
pub const RT_MOUSE_POSITION: &str = "rtMousePosition";
pub const COLLAB_CHANGE: &str = "collabChange";

// =============================================================================
// TYPES
// =============================================================================

/// A point on the board plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One action message as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: String,
    pub board_id: String,
    pub event_id: String,
    /// Two corners of a drawing (line endpoints, bounding box, ...).
    #[serde(deserialize_with = "lenient_coords")]
    pub coords: [Position; 2],
    pub mouse_position: Position,
    /// Stamped by the server; never read from input.
    #[serde(skip_deserializing)]
    pub join_order: i64,
}

/// Routing class of an action, derived from its `type` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    UpdateSingleDrawingPosition,
    RtMousePosition,
    CollabChange,
    Other,
}

/// Who receives the re-encoded action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fanout {
    /// Every connected client, sender included.
    All,
    /// Every connected client except the sender.
    ExceptSender,
}

/// Result of decoding one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Action(Action),
    Malformed { reason: String },
}

// =============================================================================
// KIND
// =============================================================================

impl ActionKind {
    /// Classify a `type` string. Exact, case-sensitive match.
    #[must_use]
    pub fn of(action_type: &str) -> Self {
        match action_type {
            UPDATE_SINGLE_DRAWING_POSITION => Self::UpdateSingleDrawingPosition,
            RT_MOUSE_POSITION => Self::RtMousePosition,
            COLLAB_CHANGE => Self::CollabChange,
            _ => Self::Other,
        }
    }

    /// Position and drawing updates are echoes of local input, so the
    /// sender is skipped. Everything else reaches the sender too.
    #[must_use]
    pub fn fanout(self) -> Fanout {
        match self {
            Self::UpdateSingleDrawingPosition | Self::RtMousePosition => Fanout::ExceptSender,
            Self::CollabChange | Self::Other => Fanout::All,
        }
    }
}

impl Action {
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        ActionKind::of(&self.action_type)
    }
}

// =============================================================================
// CODEC
// =============================================================================

/// Decode raw socket bytes into an action.
#[must_use]
pub fn decode(raw: &[u8]) -> Decoded {
    match serde_json::from_slice::<Action>(raw) {
        Ok(action) => Decoded::Action(action),
        Err(e) => Decoded::Malformed { reason: e.to_string() },
    }
}

/// Fill both corners from whatever the client sent. Extra points past
/// the second are ignored.
fn lenient_coords<'de, D>(deserializer: D) -> Result<[Position; 2], D::Error>
where
    D: Deserializer<'de>,
{
    let points: Option<Vec<Option<Position>>> = Option::deserialize(deserializer)?;
    let mut coords = [Position::default(); 2];
    for (slot, point) in coords.iter_mut().zip(points.into_iter().flatten()) {
        *slot = point.unwrap_or_default();
    }
    Ok(coords)
}

impl Decoded {
    /// Collapse into an action; malformed input becomes the zero action.
    #[must_use]
    pub fn into_action(self) -> Action {
        match self {
            Self::Action(action) => action,
            Self::Malformed { .. } => Action::default(),
        }
    }

    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

/// Encode an action for fan-out.
///
/// # Errors
///
/// Returns the underlying `serde_json` error if serialization fails.
pub fn encode(action: &Action) -> Result<String, serde_json::Error> {
    serde_json::to_string(action)
}

#[cfg(test)]
#[path = "action_test.rs"]
mod tests;
