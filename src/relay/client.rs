//! Relay client.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

use crate::config::RelayConfig;
use crate::observability::metrics;

/// Error type for relay operations.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("invalid relay target '{0}'")]
    InvalidTarget(String),

    #[error("failed to open relay socket: {0}")]
    Bind(#[source] std::io::Error),

    #[error("failed to send datagram to {target}: {source}")]
    Send {
        target: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Sends payloads to a fixed datagram destination without waiting for a reply.
#[derive(Debug, Clone, Copy)]
pub struct RelayClient {
    target: SocketAddr,
}

impl RelayClient {
    pub fn new(target: SocketAddr) -> Self {
        Self { target }
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, RelayError> {
        config
            .target_address
            .parse()
            .map(Self::new)
            .map_err(|_| RelayError::InvalidTarget(config.target_address.clone()))
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Send `payload` as a single datagram.
    ///
    /// Success only means the datagram left the local socket.
    pub async fn send(&self, payload: &[u8]) -> Result<usize, RelayError> {
        let local: SocketAddr = if self.target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(local).await.map_err(RelayError::Bind)?;
        socket
            .send_to(payload, self.target)
            .await
            .map_err(|source| RelayError::Send {
                target: self.target,
                source,
            })
    }

    /// Send `payload` on a detached task; the caller never waits for it.
    pub fn spawn_send(&self, payload: Bytes, request_id: String) -> JoinHandle<()> {
        let client = *self;
        tokio::spawn(async move {
            match client.send(&payload).await {
                Ok(sent) => {
                    metrics::record_relay("sent");
                    tracing::debug!(
                        request_id = %request_id,
                        target = %client.target,
                        bytes = sent,
                        "Submission relayed"
                    );
                }
                Err(e) => {
                    metrics::record_relay("failed");
                    tracing::error!(request_id = %request_id, error = %e, "Relay failed");
                }
            }
        })
    }
}
