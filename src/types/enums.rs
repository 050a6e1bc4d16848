//! Protocol enumerations and opaque identifier newtypes.
//!
//! Behavioral enums carry `TryFrom<u8>` conversions that reject
//! discriminants the protocol does not define. The large lookup tables for
//! car models, tracks and nationalities are outside this crate's scope, so
//! those identifiers stay as opaque newtypes around the wire integer.

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Kind of session currently running on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionType {
    Practice,
    Qualifying,
    Superpole,
    Race,
    Hotlap,
    Hotstint,
    HotlapSuperpole,
    Replay,
}

impl TryFrom<u8> for SessionType {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(SessionType::Practice),
            4 => Ok(SessionType::Qualifying),
            9 => Ok(SessionType::Superpole),
            10 => Ok(SessionType::Race),
            11 => Ok(SessionType::Hotlap),
            12 => Ok(SessionType::Hotstint),
            13 => Ok(SessionType::HotlapSuperpole),
            14 => Ok(SessionType::Replay),
            other => Err(DecodeError::UnknownSessionType(other)),
        }
    }
}

impl SessionType {
    /// Raw wire value.
    pub fn as_u8(self) -> u8 {
        match self {
            SessionType::Practice => 0,
            SessionType::Qualifying => 4,
            SessionType::Superpole => 9,
            SessionType::Race => 10,
            SessionType::Hotlap => 11,
            SessionType::Hotstint => 12,
            SessionType::HotlapSuperpole => 13,
            SessionType::Replay => 14,
        }
    }
}

/// Phase within the current session, from formation to the result screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SessionPhase {
    None,
    Starting,
    PreFormation,
    FormationLap,
    PreSession,
    Session,
    SessionOver,
    PostSession,
    ResultUi,
}

impl TryFrom<u8> for SessionPhase {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(SessionPhase::None),
            1 => Ok(SessionPhase::Starting),
            2 => Ok(SessionPhase::PreFormation),
            3 => Ok(SessionPhase::FormationLap),
            4 => Ok(SessionPhase::PreSession),
            5 => Ok(SessionPhase::Session),
            6 => Ok(SessionPhase::SessionOver),
            7 => Ok(SessionPhase::PostSession),
            8 => Ok(SessionPhase::ResultUi),
            other => Err(DecodeError::UnknownSessionPhase(other)),
        }
    }
}

/// Where a car currently is on the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarLocation {
    None,
    Track,
    Pitlane,
    PitEntry,
    PitExit,
}

impl TryFrom<u8> for CarLocation {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(CarLocation::None),
            1 => Ok(CarLocation::Track),
            2 => Ok(CarLocation::Pitlane),
            3 => Ok(CarLocation::PitEntry),
            4 => Ok(CarLocation::PitExit),
            other => Err(DecodeError::UnknownCarLocation(other)),
        }
    }
}

impl CarLocation {
    /// True for any pit-related location (lane, entry or exit).
    pub fn in_pits(self) -> bool {
        matches!(self, CarLocation::Pitlane | CarLocation::PitEntry | CarLocation::PitExit)
    }
}

/// Driver licence category.
///
/// The server transmits 255 for entries with no usable category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriverCategory {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Error,
}

impl TryFrom<u8> for DriverCategory {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(DriverCategory::Bronze),
            1 => Ok(DriverCategory::Silver),
            2 => Ok(DriverCategory::Gold),
            3 => Ok(DriverCategory::Platinum),
            255 => Ok(DriverCategory::Error),
            other => Err(DecodeError::UnknownDriverCategory(other)),
        }
    }
}

/// Cup classification of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CupCategory {
    Pro,
    ProAm,
    Am,
    Silver,
    National,
}

impl TryFrom<u8> for CupCategory {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(CupCategory::Pro),
            1 => Ok(CupCategory::ProAm),
            2 => Ok(CupCategory::Am),
            3 => Ok(CupCategory::Silver),
            4 => Ok(CupCategory::National),
            other => Err(DecodeError::UnknownCupCategory(other)),
        }
    }
}

/// Kind of broadcasting event the server announced.
///
/// Several of these are defined by the protocol but have never been observed
/// on the wire; they still decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BroadcastEventType {
    None,
    GreenFlag,
    SessionOver,
    PenaltyCommMsg,
    Accident,
    LapCompleted,
    BestSessionLap,
    BestPersonalLap,
}

impl TryFrom<u8> for BroadcastEventType {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(BroadcastEventType::None),
            1 => Ok(BroadcastEventType::GreenFlag),
            2 => Ok(BroadcastEventType::SessionOver),
            3 => Ok(BroadcastEventType::PenaltyCommMsg),
            4 => Ok(BroadcastEventType::Accident),
            5 => Ok(BroadcastEventType::LapCompleted),
            6 => Ok(BroadcastEventType::BestSessionLap),
            7 => Ok(BroadcastEventType::BestPersonalLap),
            other => Err(DecodeError::UnknownBroadcastingEvent(other)),
        }
    }
}

impl BroadcastEventType {
    /// Raw wire value.
    pub fn as_u8(self) -> u8 {
        match self {
            BroadcastEventType::None => 0,
            BroadcastEventType::GreenFlag => 1,
            BroadcastEventType::SessionOver => 2,
            BroadcastEventType::PenaltyCommMsg => 3,
            BroadcastEventType::Accident => 4,
            BroadcastEventType::LapCompleted => 5,
            BroadcastEventType::BestSessionLap => 6,
            BroadcastEventType::BestPersonalLap => 7,
        }
    }
}

/// Opaque car model identifier.
///
/// The model table (Mercedes, Ferrari, GT4 variants...) is consumed by
/// downstream tools; the protocol only moves the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CarModel(pub u8);

/// Opaque track identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub u8);

/// Opaque nationality identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nationality(pub u8);
