//! Inbound message decoding.
//!
//! [`InboundMessage`] models the seven datagram shapes the server sends as
//! a tagged sum type, one decoder per variant, selected by the leading tag
//! byte. Counted repetitions (splits, entries, drivers, cameras) stop
//! exactly at their declared count; running out of buffer mid-repetition is
//! a framing error, never a partial message.

use crate::codec::buffer::ByteReader;
use crate::error::{ClientError, DecodeError};
use crate::types::{
    BroadcastEvent, CameraSet, CarInfo, CarLocation, CarModel, CupCategory, DriverCategory,
    DriverInfo, EntryList, LapInfo, LapType, MIN_SPLIT_COUNT, Nationality, RealtimeCarUpdate,
    RealtimeUpdate, SessionPhase, SessionType, TrackData, TrackId,
};

/// Inbound message type tags.
pub mod tag {
    pub const REGISTRATION_RESULT: u8 = 1;
    pub const REALTIME_UPDATE: u8 = 2;
    pub const REALTIME_CAR_UPDATE: u8 = 3;
    pub const ENTRY_LIST: u8 = 4;
    pub const TRACK_DATA: u8 = 5;
    pub const ENTRY_LIST_CAR: u8 = 6;
    pub const BROADCASTING_EVENT: u8 = 7;
}

/// Outcome of the registration handshake.
///
/// A non-empty `error_message` means the registration failed regardless of
/// the `success` flag; the message takes precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationResult {
    pub connection_id: i32,
    pub success: bool,
    pub read_only: bool,
    pub error_message: String,
}

/// One decoded inbound datagram.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    RegistrationResult(RegistrationResult),
    RealtimeUpdate(RealtimeUpdate),
    RealtimeCarUpdate(RealtimeCarUpdate),
    EntryList(EntryList),
    TrackData(TrackData),
    EntryListCar(CarInfo),
    BroadcastingEvent(BroadcastEvent),
}

impl InboundMessage {
    /// Decode one datagram: leading tag byte, then the matching body.
    ///
    /// An unrecognised tag is a dispatch error
    /// ([`ClientError::UnknownMessageType`]); any body failure is a decode
    /// error that invalidates the whole message.
    pub fn decode(datagram: &[u8]) -> Result<Self, ClientError> {
        let mut r = ByteReader::new(datagram);
        let tag = r.read_u8().map_err(ClientError::Decode)?;
        let message = match tag {
            tag::REGISTRATION_RESULT => {
                InboundMessage::RegistrationResult(decode_registration_result(&mut r)?)
            }
            tag::REALTIME_UPDATE => InboundMessage::RealtimeUpdate(decode_realtime_update(&mut r)?),
            tag::REALTIME_CAR_UPDATE => {
                InboundMessage::RealtimeCarUpdate(decode_realtime_car_update(&mut r)?)
            }
            tag::ENTRY_LIST => InboundMessage::EntryList(decode_entry_list(&mut r)?),
            tag::TRACK_DATA => InboundMessage::TrackData(decode_track_data(&mut r)?),
            tag::ENTRY_LIST_CAR => InboundMessage::EntryListCar(decode_entry_list_car(&mut r)?),
            tag::BROADCASTING_EVENT => {
                InboundMessage::BroadcastingEvent(decode_broadcasting_event(&mut r)?)
            }
            other => return Err(ClientError::UnknownMessageType { tag: other }),
        };
        Ok(message)
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            InboundMessage::RegistrationResult(_) => "registration_result",
            InboundMessage::RealtimeUpdate(_) => "realtime_update",
            InboundMessage::RealtimeCarUpdate(_) => "realtime_car_update",
            InboundMessage::EntryList(_) => "entry_list",
            InboundMessage::TrackData(_) => "track_data",
            InboundMessage::EntryListCar(_) => "entry_list_car",
            InboundMessage::BroadcastingEvent(_) => "broadcasting_event",
        }
    }
}

fn decode_registration_result(r: &mut ByteReader<'_>) -> Result<RegistrationResult, DecodeError> {
    Ok(RegistrationResult {
        connection_id: r.read_i32()?,
        success: r.read_bool()?,
        read_only: r.read_bool()?,
        error_message: r.read_string()?,
    })
}

/// Decode one embedded lap record.
///
/// Splits arrive as a count byte followed by that many i32 values and are
/// zero-padded afterwards so a lap always carries at least
/// [`MIN_SPLIT_COUNT`] entries.
pub(crate) fn decode_lap(r: &mut ByteReader<'_>) -> Result<LapInfo, DecodeError> {
    let lap_time_ms = r.read_i32()?;
    let car_index = r.read_u16()?;
    let driver_index = r.read_u16()?;

    let split_count = r.read_u8()?;
    let mut splits = Vec::with_capacity(usize::from(split_count).max(MIN_SPLIT_COUNT));
    for _ in 0..split_count {
        splits.push(r.read_i32()?);
    }

    let is_invalid = r.read_bool()?;
    let is_valid_for_best = r.read_bool()?;
    let is_out_lap = r.read_bool()?;
    let is_in_lap = r.read_bool()?;

    while splits.len() < MIN_SPLIT_COUNT {
        splits.push(0);
    }

    Ok(LapInfo {
        lap_time_ms,
        splits,
        car_index,
        driver_index,
        is_invalid,
        is_valid_for_best,
        lap_type: LapType::from_flags(is_out_lap, is_in_lap),
    })
}

fn decode_realtime_update(r: &mut ByteReader<'_>) -> Result<RealtimeUpdate, DecodeError> {
    let event_index = r.read_u16()?;
    let session_index = r.read_u16()?;
    let session_type = SessionType::try_from(r.read_u8()?)?;
    let phase = SessionPhase::try_from(r.read_u8()?)?;
    let session_time_ms = r.read_f32()?;
    let session_end_time_ms = r.read_f32()?;
    let focused_car_index = r.read_i32()?;
    let active_camera_set = r.read_string()?;
    let active_camera = r.read_string()?;
    let current_hud_page = r.read_string()?;

    let is_replaying = r.read_bool()?;
    let (replay_session_time_ms, replay_remaining_time_ms) = if is_replaying {
        (Some(r.read_f32()?), Some(r.read_f32()?))
    } else {
        (None, None)
    };

    let time_of_day_ms = r.read_f32()?;
    let ambient_temp = r.read_u8()?;
    let track_temp = r.read_u8()?;
    let clouds = f32::from(r.read_u8()?) / 10.0;
    let rain_level = f32::from(r.read_u8()?) / 10.0;
    let wetness = f32::from(r.read_u8()?) / 10.0;
    let best_session_lap = decode_lap(r)?;

    Ok(RealtimeUpdate {
        event_index,
        session_index,
        session_type,
        phase,
        session_time_ms,
        session_end_time_ms,
        focused_car_index,
        active_camera_set,
        active_camera,
        current_hud_page,
        is_replaying,
        replay_session_time_ms,
        replay_remaining_time_ms,
        time_of_day_ms,
        ambient_temp,
        track_temp,
        clouds,
        rain_level,
        wetness,
        best_session_lap,
    })
}

fn decode_realtime_car_update(r: &mut ByteReader<'_>) -> Result<RealtimeCarUpdate, DecodeError> {
    let car_index = r.read_u16()?;
    let driver_index = r.read_u16()?;
    let driver_count = r.read_u8()?;
    // Raw gear byte is offset by 2: 1 is reverse, 2 neutral, 3 first.
    let gear = (r.read_u8()? as i8).wrapping_sub(2);
    let world_pos_x = r.read_f32()?;
    let world_pos_y = r.read_f32()?;
    let yaw = r.read_f32()?;
    let location = CarLocation::try_from(r.read_u8()?)?;
    let speed_kmh = r.read_u16()?;
    let position = r.read_u16()?;
    let cup_position = r.read_u16()?;
    let track_position = r.read_u16()?;
    let spline_position = r.read_f32()?;
    let laps = r.read_u16()?;
    let delta_ms = r.read_i32()?;
    let best_session_lap = decode_lap(r)?;
    let last_lap = decode_lap(r)?;
    let current_lap = decode_lap(r)?;

    Ok(RealtimeCarUpdate {
        car_index,
        driver_index,
        driver_count,
        gear,
        world_pos_x,
        world_pos_y,
        yaw,
        location,
        speed_kmh,
        position,
        cup_position,
        track_position,
        spline_position,
        laps,
        delta_ms,
        best_session_lap,
        last_lap,
        current_lap,
    })
}

fn decode_entry_list(r: &mut ByteReader<'_>) -> Result<EntryList, DecodeError> {
    // The leading connection id is not republished; the datagram is already
    // addressed to this socket.
    let _connection_id = r.read_i32()?;
    let count = r.read_u16()?;
    let mut entries = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        entries.push(r.read_u16()?);
    }
    Ok(entries)
}

fn decode_entry_list_car(r: &mut ByteReader<'_>) -> Result<CarInfo, DecodeError> {
    let id = r.read_u16()?;
    let model = CarModel(r.read_u8()?);
    let team_name = r.read_string()?;
    let race_number = r.read_i32()?;
    let cup_category = CupCategory::try_from(r.read_u8()?)?;
    let current_driver_id = r.read_i8()?;
    let nationality = Nationality(r.read_u8()?);

    let driver_count = r.read_u8()?;
    let mut drivers = Vec::with_capacity(usize::from(driver_count));
    for _ in 0..driver_count {
        drivers.push(DriverInfo {
            first_name: r.read_string()?,
            last_name: r.read_string()?,
            short_name: r.read_string()?,
            category: DriverCategory::try_from(r.read_u8()?)?,
            nationality: Nationality(r.read_u8()?),
        });
    }

    Ok(CarInfo {
        id,
        model,
        team_name,
        race_number,
        cup_category,
        current_driver_id,
        nationality,
        drivers,
    })
}

fn decode_track_data(r: &mut ByteReader<'_>) -> Result<TrackData, DecodeError> {
    let _connection_id = r.read_i32()?;
    let name = r.read_string()?;
    let id = TrackId(r.read_u8()?);
    let length_m = r.read_i32()?;

    let camera_set_count = r.read_u8()?;
    let mut camera_sets = Vec::with_capacity(usize::from(camera_set_count));
    for _ in 0..camera_set_count {
        let set_name = r.read_string()?;
        let camera_count = r.read_u8()?;
        let mut cameras = Vec::with_capacity(usize::from(camera_count));
        for _ in 0..camera_count {
            cameras.push(r.read_string()?);
        }
        camera_sets.push(CameraSet { name: set_name, cameras });
    }

    let hud_page_count = r.read_u8()?;
    let mut hud_pages = Vec::with_capacity(usize::from(hud_page_count));
    for _ in 0..hud_page_count {
        hud_pages.push(r.read_string()?);
    }

    Ok(TrackData { id, name, length_m, camera_sets, hud_pages })
}

fn decode_broadcasting_event(r: &mut ByteReader<'_>) -> Result<BroadcastEvent, DecodeError> {
    Ok(BroadcastEvent {
        event_type: r.read_u8()?.try_into()?,
        message: r.read_string()?,
        time_ms: r.read_i32()?,
        car_id: r.read_i32()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::buffer::ByteWriter;
    use crate::types::BroadcastEventType;

    fn encode_lap(w: &mut ByteWriter, lap_time_ms: i32, splits: &[i32]) {
        w.write_i32(lap_time_ms);
        w.write_u16(4); // car index
        w.write_u16(0); // driver index
        w.write_u8(splits.len() as u8);
        for &split in splits {
            w.write_i32(split);
        }
        w.write_bool(false); // invalid
        w.write_bool(true); // valid for best
        w.write_bool(false); // out lap
        w.write_bool(false); // in lap
    }

    #[test]
    fn registration_result_decodes() {
        let mut w = ByteWriter::new();
        w.write_u8(tag::REGISTRATION_RESULT);
        w.write_i32(1337);
        w.write_bool(true);
        w.write_bool(false);
        w.write_str("");

        let msg = InboundMessage::decode(&w.into_inner()).unwrap();
        assert_eq!(
            msg,
            InboundMessage::RegistrationResult(RegistrationResult {
                connection_id: 1337,
                success: true,
                read_only: false,
                error_message: String::new(),
            })
        );
    }

    #[test]
    fn unknown_tag_is_a_dispatch_error() {
        let err = InboundMessage::decode(&[0x2a]).unwrap_err();
        assert!(matches!(err, ClientError::UnknownMessageType { tag: 0x2a }));
    }

    #[test]
    fn empty_datagram_is_a_framing_error() {
        let err = InboundMessage::decode(&[]).unwrap_err();
        assert!(matches!(err, ClientError::Decode(DecodeError::UnexpectedEof { .. })));
    }

    #[test]
    fn lap_splits_pad_to_three() {
        for transmitted in 0..5usize {
            let splits: Vec<i32> = (0..transmitted).map(|i| 30_000 + i as i32).collect();
            let mut w = ByteWriter::new();
            encode_lap(&mut w, 95_000, &splits);
            let bytes = w.into_inner();

            let lap = decode_lap(&mut ByteReader::new(&bytes)).unwrap();
            assert_eq!(lap.splits.len(), transmitted.max(MIN_SPLIT_COUNT));
            assert_eq!(&lap.splits[..transmitted], &splits[..]);
            for &padded in &lap.splits[transmitted..] {
                assert_eq!(padded, 0);
            }
        }
    }

    #[test]
    fn lap_type_collapses_wire_flags() {
        let mut w = ByteWriter::new();
        w.write_i32(0);
        w.write_u16(0);
        w.write_u16(0);
        w.write_u8(0);
        w.write_bool(false);
        w.write_bool(false);
        w.write_bool(true); // out lap
        w.write_bool(false);
        let bytes = w.into_inner();

        let lap = decode_lap(&mut ByteReader::new(&bytes)).unwrap();
        assert_eq!(lap.lap_type, LapType::Outlap);
    }

    #[test]
    fn entry_list_yields_exactly_declared_count() {
        let mut w = ByteWriter::new();
        w.write_u8(tag::ENTRY_LIST);
        w.write_i32(7); // connection id, not republished
        w.write_u16(3);
        w.write_u16(10);
        w.write_u16(11);
        w.write_u16(12);

        match InboundMessage::decode(&w.into_inner()).unwrap() {
            InboundMessage::EntryList(entries) => assert_eq!(entries, vec![10, 11, 12]),
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn entry_list_short_of_declared_count_fails() {
        let mut w = ByteWriter::new();
        w.write_u8(tag::ENTRY_LIST);
        w.write_i32(7);
        w.write_u16(3);
        w.write_u16(10);
        w.write_u16(11);
        // third id missing

        let err = InboundMessage::decode(&w.into_inner()).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Decode(DecodeError::UnexpectedEof { needed: 2, remaining: 0 })
        ));
    }

    #[test]
    fn gear_byte_is_a_signed_offset() {
        for (raw, expected) in [(2u8, 0i8), (1, -1), (5, 3)] {
            let mut w = ByteWriter::new();
            w.write_u8(tag::REALTIME_CAR_UPDATE);
            w.write_u16(3); // car index
            w.write_u16(0); // driver index
            w.write_u8(1); // driver count
            w.write_u8(raw);
            w.write_f32(100.0); // world x
            w.write_f32(-50.0); // world y
            w.write_f32(0.5); // yaw
            w.write_u8(1); // location: track
            w.write_u16(212); // kmh
            w.write_u16(4);
            w.write_u16(2);
            w.write_u16(5);
            w.write_f32(0.37);
            w.write_u16(12);
            w.write_i32(-1_204);
            encode_lap(&mut w, 95_000, &[30_000, 31_000, 34_000]);
            encode_lap(&mut w, 96_500, &[31_000, 31_500, 34_000]);
            encode_lap(&mut w, 0, &[]);

            match InboundMessage::decode(&w.into_inner()).unwrap() {
                InboundMessage::RealtimeCarUpdate(update) => {
                    assert_eq!(update.gear, expected, "raw byte {raw}");
                    assert_eq!(update.speed_kmh, 212);
                    assert_eq!(update.delta_ms, -1_204);
                    assert_eq!(update.current_lap.splits, vec![0, 0, 0]);
                }
                other => panic!("wrong variant: {other:?}"),
            }
        }
    }

    #[test]
    fn realtime_update_without_replay_fields() {
        let mut w = ByteWriter::new();
        w.write_u8(tag::REALTIME_UPDATE);
        w.write_u16(1); // event index
        w.write_u16(0); // session index
        w.write_u8(10); // race
        w.write_u8(5); // session phase
        w.write_f32(60_000.0);
        w.write_f32(3_600_000.0);
        w.write_i32(14);
        w.write_str("Helicam");
        w.write_str("Heli1");
        w.write_str("Broadcasting");
        w.write_bool(false); // not replaying: no replay pair follows
        w.write_f32(43_200_000.0); // time of day
        w.write_u8(26);
        w.write_u8(38);
        w.write_u8(3); // clouds
        w.write_u8(0); // rain
        w.write_u8(1); // wetness
        encode_lap(&mut w, 104_000, &[33_000, 35_000, 36_000]);

        match InboundMessage::decode(&w.into_inner()).unwrap() {
            InboundMessage::RealtimeUpdate(update) => {
                assert_eq!(update.session_type, SessionType::Race);
                assert_eq!(update.phase, SessionPhase::Session);
                assert!(!update.is_replaying);
                assert_eq!(update.replay_session_time_ms, None);
                assert_eq!(update.replay_remaining_time_ms, None);
                assert_eq!(update.clouds, 0.3);
                assert_eq!(update.wetness, 0.1);
                assert_eq!(update.active_camera_set, "Helicam");
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn realtime_update_replay_fields_present_iff_replaying() {
        let mut w = ByteWriter::new();
        w.write_u8(tag::REALTIME_UPDATE);
        w.write_u16(1);
        w.write_u16(0);
        w.write_u8(14); // replay session
        w.write_u8(5);
        w.write_f32(60_000.0);
        w.write_f32(3_600_000.0);
        w.write_i32(0);
        w.write_str("set");
        w.write_str("cam");
        w.write_str("page");
        w.write_bool(true);
        w.write_f32(55_000.0); // replay session time
        w.write_f32(5_000.0); // replay remaining
        w.write_f32(0.0);
        w.write_u8(20);
        w.write_u8(25);
        w.write_u8(10);
        w.write_u8(10);
        w.write_u8(10);
        encode_lap(&mut w, 0, &[]);

        match InboundMessage::decode(&w.into_inner()).unwrap() {
            InboundMessage::RealtimeUpdate(update) => {
                assert!(update.is_replaying);
                assert_eq!(update.replay_session_time_ms, Some(55_000.0));
                assert_eq!(update.replay_remaining_time_ms, Some(5_000.0));
                assert_eq!(update.rain_level, 1.0);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn entry_list_car_with_driver_roster() {
        let mut w = ByteWriter::new();
        w.write_u8(tag::ENTRY_LIST_CAR);
        w.write_u16(21);
        w.write_u8(23); // model
        w.write_str("We Race");
        w.write_i32(912);
        w.write_u8(0); // cup: pro
        w.write_i8(1);
        w.write_u8(9); // team nationality
        w.write_u8(2); // driver count
        for (first, last, short) in [("Anna", "Kern", "KER"), ("Max", "Reiter", "REI")] {
            w.write_str(first);
            w.write_str(last);
            w.write_str(short);
            w.write_u8(2); // gold
            w.write_u8(9);
        }

        match InboundMessage::decode(&w.into_inner()).unwrap() {
            InboundMessage::EntryListCar(car) => {
                assert_eq!(car.race_number, 912);
                assert_eq!(car.drivers.len(), 2);
                assert_eq!(car.current_driver().unwrap().short_name, "REI");
                assert_eq!(car.drivers[0].category, DriverCategory::Gold);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn entry_list_car_truncated_mid_roster_fails() {
        let mut w = ByteWriter::new();
        w.write_u8(tag::ENTRY_LIST_CAR);
        w.write_u16(21);
        w.write_u8(23);
        w.write_str("We Race");
        w.write_i32(912);
        w.write_u8(0);
        w.write_i8(0);
        w.write_u8(9);
        w.write_u8(2); // two drivers declared, none encoded

        assert!(matches!(
            InboundMessage::decode(&w.into_inner()).unwrap_err(),
            ClientError::Decode(DecodeError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn track_data_nested_repetitions() {
        let mut w = ByteWriter::new();
        w.write_u8(tag::TRACK_DATA);
        w.write_i32(7);
        w.write_str("Spa-Francorchamps");
        w.write_u8(2);
        w.write_i32(7004);
        w.write_u8(2); // camera sets
        w.write_str("Helicam");
        w.write_u8(1);
        w.write_str("Heli1");
        w.write_str("Onboard");
        w.write_u8(2);
        w.write_str("Cockpit");
        w.write_str("Bonnet");
        w.write_u8(3); // hud pages
        w.write_str("Blank");
        w.write_str("Basic HUD");
        w.write_str("Broadcasting");

        match InboundMessage::decode(&w.into_inner()).unwrap() {
            InboundMessage::TrackData(track) => {
                assert_eq!(track.name, "Spa-Francorchamps");
                assert_eq!(track.length_m, 7004);
                // Set order must survive as transmitted
                assert_eq!(track.camera_sets[0].name, "Helicam");
                assert_eq!(track.camera_sets[1].cameras, vec!["Cockpit", "Bonnet"]);
                assert_eq!(track.hud_pages.len(), 3);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn broadcasting_event_decodes() {
        let mut w = ByteWriter::new();
        w.write_u8(tag::BROADCASTING_EVENT);
        w.write_u8(5); // lap completed
        w.write_str("Lap completed");
        w.write_i32(94_500);
        w.write_i32(21);

        match InboundMessage::decode(&w.into_inner()).unwrap() {
            InboundMessage::BroadcastingEvent(event) => {
                assert_eq!(event.event_type, BroadcastEventType::LapCompleted);
                assert_eq!(event.car_id, 21);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn unknown_enum_discriminant_invalidates_the_message() {
        let mut w = ByteWriter::new();
        w.write_u8(tag::BROADCASTING_EVENT);
        w.write_u8(99); // no such event type
        w.write_str("?");
        w.write_i32(0);
        w.write_i32(0);

        assert!(matches!(
            InboundMessage::decode(&w.into_inner()).unwrap_err(),
            ClientError::Decode(DecodeError::UnknownBroadcastingEvent(99))
        ));
    }
}
