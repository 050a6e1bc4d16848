//! Core types for broadcasting telemetry data.
//!
//! This module provides the domain model the wire codec decodes into and
//! the event channels publish:
//!
//! - [`RealtimeUpdate`] is the session-wide snapshot sent every interval
//! - [`RealtimeCarUpdate`] is the per-car dynamic state
//! - [`CarInfo`] / [`DriverInfo`] form the static entry-list roster
//! - [`TrackData`] describes the circuit and its broadcast cameras
//! - [`BroadcastEvent`] carries one-shot announcements
//! - [`LapInfo`] is the lap record embedded in both update shapes
//!
//! Identifiers whose lookup tables live outside this crate (car models,
//! tracks, nationalities) are opaque newtypes around the wire integer.

mod car;
mod enums;
mod event;
mod lap;
mod realtime;
mod track;

pub use car::{CarInfo, DriverInfo};
pub use enums::{
    BroadcastEventType, CarLocation, CarModel, CupCategory, DriverCategory, Nationality,
    SessionPhase, SessionType, TrackId,
};
pub use event::BroadcastEvent;
pub use lap::{INVALID_SECTOR_TIME_MS, LapInfo, LapType, MIN_SPLIT_COUNT};
pub use realtime::{RealtimeCarUpdate, RealtimeUpdate};
pub use track::{CameraSet, TrackData};

/// Ordered car ids announced ahead of the per-car roster messages.
pub type EntryList = Vec<u16>;
