//! Wire codec for the broadcasting protocol.
//!
//! Every datagram carries exactly one message: a single type-tag byte
//! followed by the message body. All multi-byte values are little-endian;
//! strings carry a 2-byte signed length prefix. [`buffer`] holds the
//! primitive codec, [`inbound`] the tagged sum type and one decoder per
//! inbound shape, [`outbound`] one encoder per command.

pub mod buffer;
pub mod inbound;
pub mod outbound;

pub use buffer::{ByteReader, ByteWriter};
pub use inbound::{InboundMessage, RegistrationResult};

/// Version byte sent with every registration request.
pub const PROTOCOL_VERSION: u8 = 4;
