//! Outbound command encoding.
//!
//! One encoder per command, each building a complete datagram payload in
//! its own buffer: tag byte, connection id (except registration), then the
//! command fields. Optional fields are gated by presence-flag bytes at the
//! wire level only; callers pass plain `Option`s.

use crate::codec::PROTOCOL_VERSION;
use crate::codec::buffer::ByteWriter;
use crate::config::ConnectionConfig;

/// Outbound message type tags.
pub mod tag {
    pub const REGISTER: u8 = 1;
    pub const UNREGISTER: u8 = 9;
    pub const REQUEST_ENTRY_LIST: u8 = 10;
    pub const REQUEST_TRACK_DATA: u8 = 11;
    pub const CHANGE_HUD_PAGE: u8 = 49;
    pub const CHANGE_FOCUS: u8 = 50;
    pub const INSTANT_REPLAY_REQUEST: u8 = 51;
}

/// Registration request, the only command sent before an id is assigned.
pub fn register(config: &ConnectionConfig) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_u8(tag::REGISTER);
    w.write_u8(PROTOCOL_VERSION);
    w.write_str(&config.display_name);
    w.write_str(&config.connection_password);
    w.write_i32(config.update_interval_ms());
    w.write_str(&config.command_password);
    w.into_inner()
}

pub fn unregister(connection_id: i32) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_u8(tag::UNREGISTER);
    w.write_i32(connection_id);
    w.into_inner()
}

pub fn request_entry_list(connection_id: i32) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_u8(tag::REQUEST_ENTRY_LIST);
    w.write_i32(connection_id);
    w.into_inner()
}

pub fn request_track_data(connection_id: i32) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_u8(tag::REQUEST_TRACK_DATA);
    w.write_i32(connection_id);
    w.into_inner()
}

/// Focus change with independently optional parts.
///
/// The camera set and camera only make sense together, so they share one
/// combined presence flag: both present or neither is written. Passing only
/// one of the two encodes the same bytes as passing neither.
pub fn change_focus(
    connection_id: i32,
    car_index: Option<u16>,
    camera_set: Option<&str>,
    camera: Option<&str>,
) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_u8(tag::CHANGE_FOCUS);
    w.write_i32(connection_id);

    w.write_bool(car_index.is_some());
    if let Some(index) = car_index {
        w.write_u16(index);
    }

    match (camera_set, camera) {
        (Some(set), Some(camera)) => {
            w.write_bool(true);
            w.write_str(set);
            w.write_str(camera);
        }
        _ => w.write_bool(false),
    }

    w.into_inner()
}

pub fn instant_replay(
    connection_id: i32,
    start_session_time_ms: f32,
    duration_ms: f32,
    initial_focus_car: i32,
    initial_camera_set: &str,
    initial_camera: &str,
) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_u8(tag::INSTANT_REPLAY_REQUEST);
    w.write_i32(connection_id);
    w.write_f32(start_session_time_ms);
    w.write_f32(duration_ms);
    w.write_i32(initial_focus_car);
    w.write_str(initial_camera_set);
    w.write_str(initial_camera);
    w.into_inner()
}

/// HUD page change, sent under its dedicated tag.
pub fn change_hud_page(connection_id: i32, hud_page: &str) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_u8(tag::CHANGE_HUD_PAGE);
    w.write_i32(connection_id);
    w.write_str(hud_page);
    w.into_inner()
}
