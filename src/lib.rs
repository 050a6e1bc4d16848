//! Modern, type-safe Rust client for the ACC broadcasting UDP protocol.
//!
//! Spotter registers with a running Assetto Corsa Competizione server,
//! decodes the live session/car/lap telemetry it broadcasts, and exposes
//! each inbound category as a typed event channel while camera, HUD and
//! replay commands can be issued concurrently.
//!
//! # Features
//!
//! - **Typed events**: one channel per inbound message category
//! - **Synchronous handshake**: registration failures surface from `connect`
//! - **Resilient receive loop**: malformed datagrams are reported, never fatal
//! - **Concurrent commands**: requests are safe alongside the receive task
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use spotter::{ConnectionConfig, Spotter};
//!
//! #[tokio::main]
//! async fn main() -> spotter::Result<()> {
//!     let config = ConnectionConfig::new("127.0.0.1:9000", "My Overlay", "asd");
//!     let (connection, mut events) = Spotter::connect(config).await?;
//!
//!     connection.request_entry_list().await?;
//!
//!     while let Some(update) = events.car_updates.recv().await {
//!         println!("car {} at {} km/h", update.car_index, update.speed_kmh);
//!     }
//!
//!     connection.disconnect().await
//! }
//! ```

// Core types and error handling
pub mod codec;
mod config;
mod error;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Client runtime
pub mod connection;
pub mod driver;
pub mod transport;

// Core exports
pub use codec::{ByteReader, ByteWriter, InboundMessage, PROTOCOL_VERSION, RegistrationResult};
pub use config::{ConnectionConfig, DEFAULT_TIMEOUT, DEFAULT_UPDATE_INTERVAL};
pub use error::*;
pub use types::*;

// Runtime exports
pub use connection::BroadcastConnection;
pub use driver::{EVENT_CHANNEL_CAPACITY, EventChannels, EventStreams, RECV_BUFFER_CAPACITY};
pub use transport::{Transport, UdpTransport};

/// Unified entry point for broadcasting connections.
///
/// # Examples
///
/// ```rust,no_run
/// use spotter::{ConnectionConfig, Spotter};
///
/// #[tokio::main]
/// async fn main() -> spotter::Result<()> {
///     let config = ConnectionConfig::new("127.0.0.1:9000", "Overlay", "asd");
///     let (connection, events) = Spotter::connect(config).await?;
///     // Use connection and events...
///     Ok(())
/// }
/// ```
pub struct Spotter;

impl Spotter {
    /// Connect and register with a broadcasting server.
    ///
    /// Performs the full handshake before returning: the server address is
    /// resolved, a registration request is sent, and the registration
    /// result is awaited within the configured timeout. On success the
    /// receive task is running and the returned [`EventChannels`] carry
    /// everything the server broadcasts.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The address cannot be resolved or the socket cannot be opened
    /// - No registration result arrives within the configured timeout
    /// - The server rejects the registration (wrong password, full slots)
    pub async fn connect(config: ConnectionConfig) -> Result<(BroadcastConnection, EventChannels)> {
        BroadcastConnection::connect(config).await
    }
}
