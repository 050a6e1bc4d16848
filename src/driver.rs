//! Driver spawns and manages the datagram receive task.
//!
//! One spawned task exclusively owns the receive side of the transport:
//! it re-arms a read deadline every iteration, decodes one datagram at a
//! time, and publishes the result to the matching bounded channel. Inbound
//! messages are processed strictly in arrival order; there is no concurrent
//! decode.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::codec::inbound::InboundMessage;
use crate::error::ClientError;
use crate::transport::Transport;
use crate::types::{
    BroadcastEvent, CarInfo, EntryList, RealtimeCarUpdate, RealtimeUpdate, TrackData,
};

/// Fixed receive buffer capacity.
///
/// A datagram that fills it exactly may have been truncated by the OS and
/// is dropped rather than decoded.
pub const RECV_BUFFER_CAPACITY: usize = 32 * 1024;

/// Capacity of each event channel.
///
/// Publishing awaits on a full channel, so a slow consumer stalls the
/// receive loop instead of silently losing messages.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Capacity of the error channel.
pub const ERROR_CHANNEL_CAPACITY: usize = 16;

/// Receivers for everything the receive task publishes, one channel per
/// inbound category plus one for non-fatal errors.
///
/// Dropping a receiver disables publication for that category only; the
/// loop and the remaining channels keep running.
#[derive(Debug)]
pub struct EventChannels {
    pub realtime_updates: mpsc::Receiver<RealtimeUpdate>,
    pub car_updates: mpsc::Receiver<RealtimeCarUpdate>,
    pub entry_lists: mpsc::Receiver<EntryList>,
    pub cars: mpsc::Receiver<CarInfo>,
    pub track_data: mpsc::Receiver<TrackData>,
    pub broadcast_events: mpsc::Receiver<BroadcastEvent>,
    pub errors: mpsc::Receiver<ClientError>,
}

impl EventChannels {
    /// Wrap every receiver in a [`Stream`](futures::Stream) for
    /// combinator-style consumption.
    pub fn into_streams(self) -> EventStreams {
        EventStreams {
            realtime_updates: ReceiverStream::new(self.realtime_updates),
            car_updates: ReceiverStream::new(self.car_updates),
            entry_lists: ReceiverStream::new(self.entry_lists),
            cars: ReceiverStream::new(self.cars),
            track_data: ReceiverStream::new(self.track_data),
            broadcast_events: ReceiverStream::new(self.broadcast_events),
            errors: ReceiverStream::new(self.errors),
        }
    }
}

/// Stream view over [`EventChannels`].
pub struct EventStreams {
    pub realtime_updates: ReceiverStream<RealtimeUpdate>,
    pub car_updates: ReceiverStream<RealtimeCarUpdate>,
    pub entry_lists: ReceiverStream<EntryList>,
    pub cars: ReceiverStream<CarInfo>,
    pub track_data: ReceiverStream<TrackData>,
    pub broadcast_events: ReceiverStream<BroadcastEvent>,
    pub errors: ReceiverStream<ClientError>,
}

struct EventSenders {
    realtime_updates: mpsc::Sender<RealtimeUpdate>,
    car_updates: mpsc::Sender<RealtimeCarUpdate>,
    entry_lists: mpsc::Sender<EntryList>,
    cars: mpsc::Sender<CarInfo>,
    track_data: mpsc::Sender<TrackData>,
    broadcast_events: mpsc::Sender<BroadcastEvent>,
    errors: mpsc::Sender<ClientError>,
}

impl EventSenders {
    async fn publish(&self, message: InboundMessage) {
        let kind = message.kind();
        let delivered = match message {
            InboundMessage::RealtimeUpdate(update) => {
                self.realtime_updates.send(update).await.is_ok()
            }
            InboundMessage::RealtimeCarUpdate(update) => {
                self.car_updates.send(update).await.is_ok()
            }
            InboundMessage::EntryList(entries) => self.entry_lists.send(entries).await.is_ok(),
            InboundMessage::EntryListCar(car) => self.cars.send(car).await.is_ok(),
            InboundMessage::TrackData(track) => self.track_data.send(track).await.is_ok(),
            InboundMessage::BroadcastingEvent(event) => {
                self.broadcast_events.send(event).await.is_ok()
            }
            // Identity is negotiated once, before this task starts; a late
            // registration result has no consumer.
            InboundMessage::RegistrationResult(result) => {
                warn!(
                    connection_id = result.connection_id,
                    "ignoring registration result received mid-session"
                );
                return;
            }
        };
        if !delivered {
            trace!(kind, "receiver dropped, message discarded");
        }
    }

    async fn report(&self, error: ClientError) {
        if self.errors.send(error).await.is_err() {
            trace!("error receiver dropped, error discarded");
        }
    }
}

/// Driver spawns the exclusive receive task for a transport.
pub struct Driver;

impl Driver {
    /// Spawn the receive task.
    ///
    /// Returns the event receivers; the task runs until `cancel` fires.
    pub fn spawn<T>(
        transport: Arc<T>,
        read_timeout: Duration,
        cancel: CancellationToken,
    ) -> EventChannels
    where
        T: Transport,
    {
        let (realtime_tx, realtime_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (car_update_tx, car_update_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (entry_list_tx, entry_list_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (car_tx, car_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (track_tx, track_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (error_tx, error_rx) = mpsc::channel(ERROR_CHANNEL_CAPACITY);

        let senders = EventSenders {
            realtime_updates: realtime_tx,
            car_updates: car_update_tx,
            entry_lists: entry_list_tx,
            cars: car_tx,
            track_data: track_tx,
            broadcast_events: event_tx,
            errors: error_tx,
        };

        tokio::spawn(async move {
            Self::receive_task(transport, read_timeout, cancel, senders).await;
        });

        EventChannels {
            realtime_updates: realtime_rx,
            car_updates: car_update_rx,
            entry_lists: entry_list_rx,
            cars: car_rx,
            track_data: track_rx,
            broadcast_events: event_rx,
            errors: error_rx,
        }
    }

    async fn receive_task<T>(
        transport: Arc<T>,
        read_timeout: Duration,
        cancel: CancellationToken,
        senders: EventSenders,
    ) where
        T: Transport,
    {
        info!("receive task started");
        let mut buf = vec![0u8; RECV_BUFFER_CAPACITY];
        let mut datagram_count = 0u64;

        loop {
            // Deadline re-armed every iteration so the loop can never block
            // indefinitely on a silent socket.
            let read = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("receive task cancelled");
                    break;
                }
                read = tokio::time::timeout(read_timeout, transport.recv(&mut buf)) => read,
            };

            let n = match read {
                Err(_) => {
                    senders.report(ClientError::Timeout { duration: read_timeout }).await;
                    continue;
                }
                Ok(Err(e)) => {
                    // A failing read after disconnect closed the socket is
                    // the expected shutdown path, not a fault.
                    if cancel.is_cancelled() {
                        info!("receive task ending, socket closed");
                        break;
                    }
                    warn!(error = %e, "datagram read failed");
                    senders.report(e).await;
                    continue;
                }
                Ok(Ok(n)) => n,
            };

            if n == RECV_BUFFER_CAPACITY {
                warn!(capacity = RECV_BUFFER_CAPACITY, "datagram filled receive buffer, dropped");
                senders
                    .report(ClientError::OversizedDatagram { capacity: RECV_BUFFER_CAPACITY })
                    .await;
                continue;
            }

            match InboundMessage::decode(&buf[..n]) {
                Ok(message) => {
                    datagram_count += 1;
                    trace!(kind = message.kind(), len = n, "datagram {datagram_count} decoded");
                    senders.publish(message).await;
                }
                Err(e) => {
                    debug!(error = %e, len = n, "undecodable datagram");
                    senders.report(e).await;
                }
            }
        }

        info!("receive task ended after {datagram_count} datagrams");
    }
}
