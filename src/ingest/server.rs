//! UDP ingest server.

use std::net::SocketAddr;

use tokio::net::UdpSocket;

use crate::config::IngestConfig;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::store::{FormStore, Submission};

/// Error type for ingest startup.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("invalid ingest address '{0}'")]
    InvalidAddress(String),

    #[error("failed to bind ingest socket on {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of handling one datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ingested {
    /// Merged under the given store key.
    Stored(String),
    /// Longer than the configured buffer; dropped.
    Oversized,
    /// Not a valid url-encoded body; dropped.
    Malformed,
    /// Decoded but the store could not be updated.
    Failed,
}

impl Ingested {
    fn label(&self) -> &'static str {
        match self {
            Ingested::Stored(_) => "stored",
            Ingested::Oversized => "oversized",
            Ingested::Malformed => "malformed",
            Ingested::Failed => "failed",
        }
    }
}

/// Sole writer of the store, fed by datagrams.
pub struct IngestServer {
    socket: UdpSocket,
    store: FormStore,
    buffer_size: usize,
}

impl IngestServer {
    /// Bind the datagram socket. Takes ownership of the store.
    pub async fn bind(config: &IngestConfig, store: FormStore) -> Result<Self, IngestError> {
        let address: SocketAddr = config
            .bind_address
            .parse()
            .map_err(|_| IngestError::InvalidAddress(config.bind_address.clone()))?;

        let socket = UdpSocket::bind(address)
            .await
            .map_err(|source| IngestError::Bind { address, source })?;

        tracing::info!(
            address = %socket.local_addr().unwrap_or(address),
            buffer_size = config.buffer_size,
            store = %store.path().display(),
            "Ingest server bound"
        );

        Ok(Self {
            socket,
            store,
            buffer_size: config.buffer_size,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Receive and merge datagrams until shutdown is signalled.
    pub async fn run(mut self, mut shutdown: ShutdownSignal) {
        // One spare byte tells a datagram of exactly `buffer_size` apart from a longer one.
        let mut buf = vec![0u8; self.buffer_size + 1];

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Ingest server stopping");
                    break;
                }
                received = self.socket.recv_from(&mut buf) => {
                    match received {
                        Ok((len, peer)) => {
                            self.ingest(&buf[..len], peer).await;
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Datagram receive failed");
                        }
                    }
                }
            }
        }

        tracing::info!("Ingest server stopped");
    }

    /// Decode one datagram and merge it into the store.
    pub async fn ingest(&mut self, payload: &[u8], peer: SocketAddr) -> Ingested {
        metrics::record_datagram();
        let outcome = self.process(payload, peer).await;
        metrics::record_merge(outcome.label());
        outcome
    }

    async fn process(&mut self, payload: &[u8], peer: SocketAddr) -> Ingested {
        if payload.len() > self.buffer_size {
            tracing::warn!(
                peer = %peer,
                limit = self.buffer_size,
                "Datagram exceeds buffer size, dropped"
            );
            return Ingested::Oversized;
        }

        let submission = match Submission::decode(payload) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(
                    peer = %peer,
                    error = %e,
                    body = %String::from_utf8_lossy(payload),
                    "Malformed submission dropped"
                );
                return Ingested::Malformed;
            }
        };

        match self.store.merge(&submission).await {
            Ok(key) => {
                tracing::info!(key = %key, fields = submission.len(), "Submission stored");
                Ingested::Stored(key)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %String::from_utf8_lossy(payload),
                    "Failed to store submission"
                );
                Ingested::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;
    use std::time::Duration;

    async fn server_in(dir: &tempfile::TempDir, buffer_size: usize) -> (IngestServer, FormStore) {
        let path = dir.path().join("data.json");
        let store = FormStore::new(&path);
        store.init().await.unwrap();

        let config = IngestConfig {
            bind_address: "127.0.0.1:0".into(),
            buffer_size,
        };
        let server = IngestServer::bind(&config, store).await.unwrap();
        (server, FormStore::new(path))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[tokio::test]
    async fn valid_datagram_is_stored() {
        let dir = tempfile::tempdir().unwrap();
        let (mut server, reader) = server_in(&dir, 1024).await;

        let key = match server.ingest(b"name=Alice&email=a%40b.com", peer()).await {
            Ingested::Stored(key) => key,
            other => panic!("expected stored, got {:?}", other),
        };

        let record = reader.load().await.unwrap();
        assert_eq!(record[&key]["name"], "Alice");
        assert_eq!(record[&key]["email"], "a@b.com");
    }

    #[tokio::test]
    async fn malformed_datagram_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let (mut server, reader) = server_in(&dir, 1024).await;

        assert_eq!(server.ingest(b"a=1&bad", peer()).await, Ingested::Malformed);
        assert!(reader.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn oversized_datagram_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let (mut server, reader) = server_in(&dir, 8).await;

        assert_eq!(server.ingest(b"a=123456789", peer()).await, Ingested::Oversized);
        assert!(matches!(server.ingest(b"a=123456", peer()).await, Ingested::Stored(_)));
        assert_eq!(reader.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn broken_store_is_reported_and_loop_survives() {
        let dir = tempfile::tempdir().unwrap();
        let (mut server, reader) = server_in(&dir, 1024).await;
        std::fs::write(reader.path(), "garbage").unwrap();

        assert_eq!(server.ingest(b"a=1", peer()).await, Ingested::Failed);

        std::fs::write(reader.path(), "{}").unwrap();
        assert!(matches!(server.ingest(b"a=2", peer()).await, Ingested::Stored(_)));
    }

    #[tokio::test]
    async fn run_merges_received_datagrams_until_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let (server, reader) = server_in(&dir, 1024).await;
        let addr = server.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let handle = tokio::spawn(server.run(shutdown.subscribe()));

        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(b"a=1", addr).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        sender.send_to(b"broken", addr).await.unwrap();
        sender.send_to(b"b=2", addr).await.unwrap();

        let mut entries = 0;
        for _ in 0..100 {
            entries = reader.load().await.map(|r| r.len()).unwrap_or(0);
            if entries == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(entries, 2);

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("ingest loop did not stop")
            .unwrap();
    }
}
