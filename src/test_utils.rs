//! Test utilities: a scripted in-process transport and datagram builders.
//!
//! Shared by the unit tests in `driver`/`connection` and by the decode
//! benchmarks.

#![cfg(any(test, feature = "benchmark"))]

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, Result};
use crate::transport::Transport;

/// In-process [`Transport`] fed by the test.
///
/// Injected datagrams are handed to `recv` one per call, in injection
/// order. Everything sent through the transport is captured and can be
/// awaited with [`MockTransport::next_sent`]. [`MockTransport::close`]
/// makes both directions fail like a closed socket, waking a pending read.
#[derive(Debug)]
pub struct MockTransport {
    inbound_tx: mpsc::UnboundedSender<Vec<u8>>,
    inbound_rx: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
    sent_tx: mpsc::UnboundedSender<Vec<u8>>,
    sent_rx: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
    closed: CancellationToken,
}

impl MockTransport {
    pub fn new() -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        Self {
            inbound_tx,
            inbound_rx: Mutex::new(inbound_rx),
            sent_tx,
            sent_rx: Mutex::new(sent_rx),
            closed: CancellationToken::new(),
        }
    }

    /// Queue a datagram for the next `recv` call.
    pub fn inject(&self, datagram: Vec<u8>) {
        let _ = self.inbound_tx.send(datagram);
    }

    /// Await the next datagram written through the transport.
    pub async fn next_sent(&self) -> Option<Vec<u8>> {
        self.sent_rx.lock().await.recv().await
    }

    /// Simulate the socket being closed out from under the loop.
    pub fn close(&self) {
        self.closed.cancel();
    }

    fn closed_error(context: &str) -> ClientError {
        ClientError::transport(
            context,
            std::io::Error::new(std::io::ErrorKind::NotConnected, "socket closed"),
        )
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, datagram: &[u8]) -> Result<()> {
        if self.closed.is_cancelled() {
            return Err(Self::closed_error("send"));
        }
        let _ = self.sent_tx.send(datagram.to_vec());
        Ok(())
    }

    async fn recv(&self, buf: &mut [u8]) -> Result<usize> {
        let mut inbound = self.inbound_rx.lock().await;
        let datagram = tokio::select! {
            _ = self.closed.cancelled() => return Err(Self::closed_error("recv")),
            datagram = inbound.recv() => datagram,
        };
        match datagram {
            Some(datagram) => {
                // Same truncation behavior as a real datagram socket
                let n = datagram.len().min(buf.len());
                buf[..n].copy_from_slice(&datagram[..n]);
                Ok(n)
            }
            None => Err(Self::closed_error("recv")),
        }
    }
}

/// Builders producing well-formed inbound datagrams.
pub mod datagrams {
    use crate::codec::buffer::ByteWriter;
    use crate::codec::inbound::tag;
    use crate::types::{BroadcastEventType, SessionType};

    /// Append one lap record.
    pub fn write_lap(w: &mut ByteWriter, lap_time_ms: i32, splits: &[i32]) {
        w.write_i32(lap_time_ms);
        w.write_u16(0);
        w.write_u16(0);
        w.write_u8(splits.len() as u8);
        for &split in splits {
            w.write_i32(split);
        }
        w.write_bool(false);
        w.write_bool(lap_time_ms > 0);
        w.write_bool(false);
        w.write_bool(false);
    }

    pub fn registration_result(
        connection_id: i32,
        success: bool,
        read_only: bool,
        error_message: &str,
    ) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.write_u8(tag::REGISTRATION_RESULT);
        w.write_i32(connection_id);
        w.write_bool(success);
        w.write_bool(read_only);
        w.write_str(error_message);
        w.into_inner()
    }

    pub fn entry_list(car_ids: &[u16]) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.write_u8(tag::ENTRY_LIST);
        w.write_i32(0);
        w.write_u16(car_ids.len() as u16);
        for &id in car_ids {
            w.write_u16(id);
        }
        w.into_inner()
    }

    pub fn entry_list_car(id: u16, team_name: &str, race_number: i32, drivers: &[&str]) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.write_u8(tag::ENTRY_LIST_CAR);
        w.write_u16(id);
        w.write_u8(23); // model
        w.write_str(team_name);
        w.write_i32(race_number);
        w.write_u8(0); // cup category
        w.write_i8(0);
        w.write_u8(9); // nationality
        w.write_u8(drivers.len() as u8);
        for short in drivers {
            w.write_str("First");
            w.write_str("Last");
            w.write_str(short);
            w.write_u8(1); // silver
            w.write_u8(9);
        }
        w.into_inner()
    }

    pub fn realtime_update(session_time_ms: f32, speed_factor: u8) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.write_u8(tag::REALTIME_UPDATE);
        w.write_u16(0);
        w.write_u16(1);
        w.write_u8(SessionType::Race.as_u8());
        w.write_u8(5); // session phase
        w.write_f32(session_time_ms);
        w.write_f32(3_600_000.0);
        w.write_i32(12);
        w.write_str("Helicam");
        w.write_str("Heli1");
        w.write_str("Broadcasting");
        w.write_bool(false);
        w.write_f32(50_400_000.0);
        w.write_u8(24);
        w.write_u8(33);
        w.write_u8(speed_factor % 11);
        w.write_u8(0);
        w.write_u8(1);
        write_lap(&mut w, 104_358, &[33_512, 35_420, 35_426]);
        w.into_inner()
    }

    pub fn car_update(car_index: u16, raw_gear: u8, speed_kmh: u16) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.write_u8(tag::REALTIME_CAR_UPDATE);
        w.write_u16(car_index);
        w.write_u16(0);
        w.write_u8(2); // drivers on the car
        w.write_u8(raw_gear);
        w.write_f32(411.8);
        w.write_f32(-208.6);
        w.write_f32(1.2);
        w.write_u8(1); // on track
        w.write_u16(speed_kmh);
        w.write_u16(4);
        w.write_u16(2);
        w.write_u16(4);
        w.write_f32(0.481);
        w.write_u16(17);
        w.write_i32(-352);
        write_lap(&mut w, 104_358, &[33_512, 35_420, 35_426]);
        write_lap(&mut w, 104_991, &[33_700, 35_601, 35_690]);
        write_lap(&mut w, 0, &[]);
        w.into_inner()
    }

    pub fn track_data(name: &str, length_m: i32) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.write_u8(tag::TRACK_DATA);
        w.write_i32(0);
        w.write_str(name);
        w.write_u8(2);
        w.write_i32(length_m);
        w.write_u8(2);
        w.write_str("Helicam");
        w.write_u8(1);
        w.write_str("Heli1");
        w.write_str("Onboard");
        w.write_u8(3);
        w.write_str("Cockpit");
        w.write_str("Bonnet");
        w.write_str("Chase");
        w.write_u8(2);
        w.write_str("Blank");
        w.write_str("Broadcasting");
        w.into_inner()
    }

    pub fn broadcast_event(
        event_type: BroadcastEventType,
        message: &str,
        time_ms: i32,
        car_id: i32,
    ) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.write_u8(tag::BROADCASTING_EVENT);
        w.write_u8(event_type.as_u8());
        w.write_str(message);
        w.write_i32(time_ms);
        w.write_i32(car_id);
        w.into_inner()
    }

}
