//! Per-tick dynamic state: the session-wide snapshot and per-car updates.
//!
//! Time-like fields keep the protocol's raw `f32` millisecond semantics
//! (milliseconds since session start for session clocks, since midnight for
//! the time of day). No wall-clock anchoring is attempted here; consumers
//! that need absolute timestamps can anchor against their own receipt time.

use serde::{Deserialize, Serialize};

use super::enums::{CarLocation, SessionPhase, SessionType};
use super::lap::LapInfo;

/// Session-wide snapshot, sent once per update interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeUpdate {
    pub event_index: u16,
    pub session_index: u16,
    pub session_type: SessionType,
    pub phase: SessionPhase,
    /// Elapsed session time in ms.
    pub session_time_ms: f32,
    /// Scheduled session end in ms of session time.
    pub session_end_time_ms: f32,
    pub focused_car_index: i32,
    pub active_camera_set: String,
    pub active_camera: String,
    pub current_hud_page: String,
    pub is_replaying: bool,
    /// Present only while `is_replaying`.
    pub replay_session_time_ms: Option<f32>,
    /// Present only while `is_replaying`.
    pub replay_remaining_time_ms: Option<f32>,
    /// Time of day on track, ms since midnight.
    pub time_of_day_ms: f32,
    pub ambient_temp: u8,
    pub track_temp: u8,
    /// Cloud cover in [0.0, 1.0].
    pub clouds: f32,
    /// Rain intensity in [0.0, 1.0].
    pub rain_level: f32,
    /// Track wetness in [0.0, 1.0].
    pub wetness: f32,
    pub best_session_lap: LapInfo,
}

impl RealtimeUpdate {
    /// Remaining session time in ms, clamped at zero.
    pub fn remaining_time_ms(&self) -> f32 {
        (self.session_end_time_ms - self.session_time_ms).max(0.0)
    }
}

/// Dynamic state of one car, sent per car per update interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeCarUpdate {
    pub car_index: u16,
    pub driver_index: u16,
    pub driver_count: u8,
    /// Signed gear: -1 reverse, 0 neutral, 1.. forward.
    pub gear: i8,
    pub world_pos_x: f32,
    pub world_pos_y: f32,
    pub yaw: f32,
    pub location: CarLocation,
    pub speed_kmh: u16,
    /// Official position.
    pub position: u16,
    /// Position within the car's cup category.
    pub cup_position: u16,
    /// Position derived from the track spline.
    pub track_position: u16,
    /// Progress around the lap in [0.0, 1.0].
    pub spline_position: f32,
    pub laps: u16,
    /// Realtime delta to the best session lap, in ms.
    pub delta_ms: i32,
    pub best_session_lap: LapInfo,
    pub last_lap: LapInfo,
    pub current_lap: LapInfo,
}
