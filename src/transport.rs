//! Datagram transport seam.
//!
//! [`Transport`] abstracts the socket so the driver loop and the
//! connection layer can be exercised against an in-process implementation.
//! Both methods take `&self`: the receive loop is the sole reader while any
//! number of request calls send concurrently, and each datagram is written
//! whole, so no interior mutability is needed at this seam.

use tokio::net::UdpSocket;
use tracing::debug;

use crate::error::{ClientError, Result};

/// A connected, message-oriented transport carrying one datagram per call.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Send one datagram, whole.
    async fn send(&self, datagram: &[u8]) -> Result<()>;

    /// Receive one datagram into `buf`, returning its length.
    ///
    /// A datagram longer than `buf` is truncated by the OS; callers detect
    /// that by sizing `buf` to the protocol's receive capacity and treating
    /// an exact fill as suspect.
    async fn recv(&self, buf: &mut [u8]) -> Result<usize>;
}

/// Production transport over a connected UDP socket.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Bind an ephemeral local port and connect it to the server address.
    ///
    /// Connecting fixes the peer so plain `send`/`recv` apply and stray
    /// datagrams from other hosts are filtered by the OS.
    pub async fn connect(address: &str) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| ClientError::transport("bind", e))?;
        socket.connect(address).await.map_err(|e| ClientError::transport("connect", e))?;
        debug!(local = ?socket.local_addr().ok(), peer = %address, "udp socket connected");
        Ok(Self { socket })
    }
}

#[async_trait::async_trait]
impl Transport for UdpTransport {
    async fn send(&self, datagram: &[u8]) -> Result<()> {
        let written =
            self.socket.send(datagram).await.map_err(|e| ClientError::transport("send", e))?;
        if written != datagram.len() {
            return Err(ClientError::transport(
                "send",
                std::io::Error::other(format!(
                    "short datagram write: {written} of {} bytes",
                    datagram.len()
                )),
            ));
        }
        Ok(())
    }

    async fn recv(&self, buf: &mut [u8]) -> Result<usize> {
        self.socket.recv(buf).await.map_err(|e| ClientError::transport("recv", e))
    }
}
