//! Error types for the broadcasting client.
//!
//! This module provides error handling for the spotter client library.
//! All errors implement the `std::error::Error` trait and carry enough
//! structured context to decide whether an operation is worth retrying.
//!
//! ## Error Categories
//!
//! - **Transport Errors**: socket resolve/bind/read/write failures
//! - **Timeouts**: a bounded read expired without a datagram arriving
//! - **Decode Errors**: a datagram did not contain a well-formed message
//! - **Handshake Errors**: the server rejected our registration
//! - **Dispatch Errors**: a datagram carried an unrecognised type tag
//! - **Oversized Datagrams**: a datagram filled the receive buffer exactly,
//!   so truncation cannot be ruled out
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use spotter::ClientError;
//!
//! let error = ClientError::handshake("wrong connection password");
//! if error.is_retryable() {
//!     println!("Can retry this operation");
//! }
//! ```

use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Failure to decode a single protocol message out of a datagram.
///
/// One malformed field invalidates the whole message; there is no
/// resynchronization within a datagram.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("buffer underrun: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("string length prefix {declared} is negative")]
    NegativeStringLength { declared: i16 },

    #[error("unrecognised session type `{0}`")]
    UnknownSessionType(u8),

    #[error("unrecognised session phase `{0}`")]
    UnknownSessionPhase(u8),

    #[error("unrecognised car location `{0}`")]
    UnknownCarLocation(u8),

    #[error("unrecognised driver category `{0}`")]
    UnknownDriverCategory(u8),

    #[error("unrecognised cup category `{0}`")]
    UnknownCupCategory(u8),

    #[error("unrecognised broadcasting event type `{0}`")]
    UnknownBroadcastingEvent(u8),
}

/// Main error type for client operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ClientError {
    #[error("Transport error during {context}")]
    Transport {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Read timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("Failed to decode inbound message")]
    Decode(#[from] DecodeError),

    #[error("Registration rejected by server: {message}")]
    Handshake { message: String },

    #[error("Unknown inbound message type tag {tag:#04x}")]
    UnknownMessageType { tag: u8 },

    #[error("Datagram filled the {capacity}-byte receive buffer, possible truncation")]
    OversizedDatagram { capacity: usize },

    #[error("Event channel `{channel}` closed by receiver")]
    ChannelClosed { channel: &'static str },
}

impl ClientError {
    /// Returns whether this error is potentially recoverable through retry.
    ///
    /// Per-datagram failures (decode, dispatch, oversize) are not retryable:
    /// the datagram is gone. Transport faults and timeouts may clear on the
    /// next read cycle.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport { .. } => true,
            ClientError::Timeout { .. } => true,
            ClientError::Decode(_) => false,
            ClientError::Handshake { .. } => false,
            ClientError::UnknownMessageType { .. } => false,
            ClientError::OversizedDatagram { .. } => false,
            ClientError::ChannelClosed { .. } => false,
        }
    }

    /// Helper constructor for transport errors with operation context.
    pub fn transport(context: impl Into<String>, source: std::io::Error) -> Self {
        ClientError::Transport { context: context.into(), source }
    }

    /// Helper constructor for handshake failures.
    pub fn handshake(message: impl Into<String>) -> Self {
        ClientError::Handshake { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn error_messages_contain_their_context(
                context in "\\w+",
                message in ".*",
                tag in any::<u8>(),
                capacity in 1usize..0x10000usize,
            ) {
                let io_err = std::io::Error::other("boom");
                let transport = ClientError::transport(context.clone(), io_err);
                prop_assert!(transport.to_string().contains(&context));

                let handshake = ClientError::handshake(message.clone());
                prop_assert!(handshake.to_string().contains(&message));

                let unknown = ClientError::UnknownMessageType { tag };
                let tag_hex = format!("{tag:#04x}");
                prop_assert!(unknown.to_string().contains(&tag_hex));

                let oversized = ClientError::OversizedDatagram { capacity };
                prop_assert!(oversized.to_string().contains(&capacity.to_string()));
            }

            #[test]
            fn transport_errors_preserve_their_source(reason in ".*") {
                let io_err = std::io::Error::other(reason.clone());
                let err = ClientError::transport("read", io_err);
                let source = std::error::Error::source(&err).expect("source must be chained");
                prop_assert_eq!(source.to_string(), reason);
            }

            #[test]
            fn decode_errors_convert_and_display(value in any::<u8>()) {
                let err: ClientError = DecodeError::UnknownSessionPhase(value).into();
                prop_assert!(matches!(err, ClientError::Decode(_)));
                prop_assert!(!err.to_string().is_empty());
            }
        }
    }

    #[test]
    fn retryability_classification() {
        let transport = ClientError::transport("read", std::io::Error::other("x"));
        let timeout = ClientError::Timeout { duration: Duration::from_millis(500) };
        let decode: ClientError = DecodeError::UnexpectedEof { needed: 4, remaining: 0 }.into();
        let handshake = ClientError::handshake("rejected");

        assert!(transport.is_retryable());
        assert!(timeout.is_retryable());
        assert!(!decode.is_retryable());
        assert!(!handshake.is_retryable());
        assert!(!ClientError::UnknownMessageType { tag: 0xff }.is_retryable());
        assert!(!ClientError::OversizedDatagram { capacity: 32768 }.is_retryable());
    }

    #[test]
    fn error_traits_validation() {
        // Compile-time check: ClientError must be Send + Sync + 'static
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<ClientError>();
        assert_send_sync_static::<DecodeError>();

        let error = ClientError::handshake("test");
        let _: &dyn std::error::Error = &error;
    }
}
