//! Broadcasting events announced by the server.

use serde::{Deserialize, Serialize};

use super::enums::BroadcastEventType;

/// A one-shot announcement such as a completed lap or a new session best.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastEvent {
    pub event_type: BroadcastEventType,
    pub message: String,
    /// Session time of the event in ms.
    pub time_ms: i32,
    /// Car the event refers to; meaning depends on the event type.
    pub car_id: i32,
}
