//! Connection configuration for the broadcasting client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default realtime update interval requested from the server.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(250);

/// Default bound for a single socket read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Parameters for one broadcasting session, fixed at construction.
///
/// The server reads the connection password to admit the client and the
/// command password to allow camera/HUD/replay control; the two are
/// independent credentials. The update interval is a request, not a
/// guarantee: the server decides the actual cadence.
///
/// # Examples
///
/// ```rust
/// use spotter::ConnectionConfig;
/// use std::time::Duration;
///
/// let config = ConnectionConfig::new("127.0.0.1:9000", "Overlay", "asd")
///     .with_command_password("admin")
///     .with_update_interval(Duration::from_millis(100));
/// assert_eq!(config.update_interval_ms(), 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Server address, `host:port`.
    pub address: String,
    /// Name this client registers under, shown in the server UI.
    pub display_name: String,
    pub connection_password: String,
    pub command_password: String,
    /// Requested interval between realtime updates.
    pub update_interval: Duration,
    /// Upper bound for a single socket read; re-armed every loop iteration.
    pub timeout: Duration,
}

impl ConnectionConfig {
    /// Configuration with the default update interval and timeout and no
    /// command password.
    pub fn new(
        address: impl Into<String>,
        display_name: impl Into<String>,
        connection_password: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            display_name: display_name.into(),
            connection_password: connection_password.into(),
            command_password: String::new(),
            update_interval: DEFAULT_UPDATE_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_command_password(mut self, command_password: impl Into<String>) -> Self {
        self.command_password = command_password.into();
        self
    }

    pub fn with_update_interval(mut self, update_interval: Duration) -> Self {
        self.update_interval = update_interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Update interval as transmitted in the registration request.
    ///
    /// The wire field is a signed 32-bit millisecond count; longer intervals
    /// saturate rather than wrap.
    pub fn update_interval_ms(&self) -> i32 {
        i32::try_from(self.update_interval.as_millis()).unwrap_or(i32::MAX)
    }
}
