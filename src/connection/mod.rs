//! Broadcasting session lifecycle: handshake, requests, disconnect.
//!
//! [`BroadcastConnection::connect`] performs the registration handshake
//! before any event plumbing exists, so handshake failures surface
//! synchronously from `connect` and the assigned connection id is written
//! exactly once. Only after a successful registration is the receive task
//! spawned and the connection handed to the caller, which also makes
//! premature command sends unrepresentable.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::codec::inbound::{InboundMessage, RegistrationResult};
use crate::codec::outbound;
use crate::config::ConnectionConfig;
use crate::driver::{Driver, EventChannels, RECV_BUFFER_CAPACITY};
use crate::error::{ClientError, Result};
use crate::transport::{Transport, UdpTransport};


/// One registered session with a broadcasting server.
///
/// Command methods may be called concurrently with each other and with the
/// running receive task; every call encodes into its own buffer and sends
/// one whole datagram. Dropping the connection stops the receive task; use
/// [`BroadcastConnection::disconnect`] to also unregister from the server.
#[derive(Debug)]
pub struct BroadcastConnection<T: Transport = UdpTransport> {
    transport: Arc<T>,
    config: ConnectionConfig,
    connection_id: i32,
    read_only: bool,
    cancel: CancellationToken,
}

impl BroadcastConnection<UdpTransport> {
    /// Resolve the server address, register, and start the receive task.
    ///
    /// Returns the connection together with the event channels the receive
    /// task publishes into. Fails synchronously on transport errors, on a
    /// handshake timeout, and on a rejected registration.
    pub async fn connect(config: ConnectionConfig) -> Result<(Self, EventChannels)> {
        info!(address = %config.address, display_name = %config.display_name, "connecting");
        let transport = Arc::new(UdpTransport::connect(&config.address).await?);
        Self::establish(transport, config).await
    }
}

impl<T: Transport> BroadcastConnection<T> {
    /// Register over an already-connected transport.
    pub(crate) async fn establish(
        transport: Arc<T>,
        config: ConnectionConfig,
    ) -> Result<(Self, EventChannels)> {
        transport.send(&outbound::register(&config)).await?;

        let result = await_registration(transport.as_ref(), config.timeout).await?;
        // A non-empty error message outranks the success flag.
        if !result.error_message.is_empty() {
            return Err(ClientError::handshake(result.error_message));
        }
        if !result.success {
            return Err(ClientError::handshake("registration refused by server"));
        }
        info!(
            connection_id = result.connection_id,
            read_only = result.read_only,
            "registration acknowledged"
        );

        let cancel = CancellationToken::new();
        let channels = Driver::spawn(transport.clone(), config.timeout, cancel.clone());

        let connection = Self {
            transport,
            config,
            connection_id: result.connection_id,
            read_only: result.read_only,
            cancel,
        };
        Ok((connection, channels))
    }

    /// Server-assigned id carried by every command.
    pub fn connection_id(&self) -> i32 {
        self.connection_id
    }

    /// Whether the server admitted this client without command rights.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Ask the server to (re)send the entry list.
    pub async fn request_entry_list(&self) -> Result<()> {
        self.transport.send(&outbound::request_entry_list(self.connection_id)).await
    }

    /// Ask the server for track metadata and broadcast cameras.
    pub async fn request_track_data(&self) -> Result<()> {
        self.transport.send(&outbound::request_track_data(self.connection_id)).await
    }

    /// Change the focused car and/or the active camera.
    ///
    /// The camera set and camera are only applied together; passing one
    /// without the other leaves the camera unchanged.
    pub async fn change_focus(
        &self,
        car_index: Option<u16>,
        camera_set: Option<&str>,
        camera: Option<&str>,
    ) -> Result<()> {
        self.transport
            .send(&outbound::change_focus(self.connection_id, car_index, camera_set, camera))
            .await
    }

    /// Start an instant replay of the given window of session time.
    pub async fn request_instant_replay(
        &self,
        start_session_time_ms: f32,
        duration_ms: f32,
        initial_focus_car: i32,
        initial_camera_set: &str,
        initial_camera: &str,
    ) -> Result<()> {
        self.transport
            .send(&outbound::instant_replay(
                self.connection_id,
                start_session_time_ms,
                duration_ms,
                initial_focus_car,
                initial_camera_set,
                initial_camera,
            ))
            .await
    }

    /// Switch the broadcast HUD to the named page.
    pub async fn change_hud_page(&self, hud_page: &str) -> Result<()> {
        self.transport.send(&outbound::change_hud_page(self.connection_id, hud_page)).await
    }

    /// Unregister from the server, then stop the receive task.
    ///
    /// The unregister datagram goes out before teardown so the server can
    /// release the slot; the receive task then observes the cancellation
    /// and terminates cleanly.
    pub async fn disconnect(self) -> Result<()> {
        info!(connection_id = self.connection_id, "disconnecting");
        let sent = self.transport.send(&outbound::unregister(self.connection_id)).await;
        self.cancel.cancel();
        sent
    }
}

impl<T: Transport> Drop for BroadcastConnection<T> {
    fn drop(&mut self) {
        debug!("dropping connection");
        self.cancel.cancel();
    }
}

/// Wait for the registration result, bounded by `timeout`.
///
/// The server may interleave other traffic before the acknowledgment;
/// anything that is not a registration result is skipped here (the event
/// channels do not exist yet). Transport failures during the handshake are
/// fatal to `connect`.
async fn await_registration<T: Transport>(
    transport: &T,
    timeout: Duration,
) -> Result<RegistrationResult> {
    let deadline = Instant::now() + timeout;
    let mut buf = vec![0u8; RECV_BUFFER_CAPACITY];

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(ClientError::Timeout { duration: timeout });
        }

        let n = match tokio::time::timeout(remaining, transport.recv(&mut buf)).await {
            Err(_) => return Err(ClientError::Timeout { duration: timeout }),
            Ok(read) => read?,
        };

        if n == RECV_BUFFER_CAPACITY {
            warn!(capacity = RECV_BUFFER_CAPACITY, "oversized datagram during handshake, dropped");
            continue;
        }

        match InboundMessage::decode(&buf[..n]) {
            Ok(InboundMessage::RegistrationResult(result)) => return Ok(result),
            Ok(other) => {
                debug!(kind = other.kind(), "skipping message while awaiting registration");
            }
            Err(e) => {
                warn!(error = %e, "undecodable datagram during handshake");
            }
        }
    }
}
