//! Startup orchestration.
//!
//! # Responsibilities
//! - Create the store file if it does not exist
//! - Bind the ingest socket and the HTTP listener
//! - Run both servers as independent tasks under one shutdown trigger

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinSet;

use crate::config::FormRelayConfig;
use crate::http::{HttpError, HttpServer};
use crate::ingest::{IngestError, IngestServer};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals;
use crate::store::{FormStore, StoreError};

/// Error type for startup. Every variant is fatal.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("failed to bind HTTP listener on {address}: {source}")]
    HttpBind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read bound address: {0}")]
    LocalAddr(#[source] std::io::Error),
}

/// Both server units, running.
pub struct Running {
    http_addr: SocketAddr,
    ingest_addr: SocketAddr,
    shutdown: Shutdown,
    tasks: JoinSet<&'static str>,
}

/// Bring up the store, the ingest server and the HTTP server.
pub async fn start(config: &FormRelayConfig) -> Result<Running, StartupError> {
    let store = FormStore::new(&config.store.path);
    store.init().await?;

    let ingest = IngestServer::bind(&config.ingest, store).await?;
    let ingest_addr = ingest.local_addr().map_err(StartupError::LocalAddr)?;

    let http = HttpServer::new(config)?;
    let listener = TcpListener::bind(&config.http.bind_address)
        .await
        .map_err(|source| StartupError::HttpBind {
            address: config.http.bind_address.clone(),
            source,
        })?;
    let http_addr = listener.local_addr().map_err(StartupError::LocalAddr)?;

    let shutdown = Shutdown::new();
    let mut tasks = JoinSet::new();

    let ingest_shutdown = shutdown.subscribe();
    tasks.spawn(async move {
        ingest.run(ingest_shutdown).await;
        "ingest"
    });

    let http_shutdown = shutdown.subscribe();
    tasks.spawn(async move {
        if let Err(e) = http.run(listener, http_shutdown).await {
            tracing::error!(error = %e, "HTTP server failed");
        }
        "http"
    });

    tracing::info!(http = %http_addr, ingest = %ingest_addr, "Form relay running");

    Ok(Running {
        http_addr,
        ingest_addr,
        shutdown,
        tasks,
    })
}

impl Running {
    pub fn http_addr(&self) -> SocketAddr {
        self.http_addr
    }

    pub fn ingest_addr(&self) -> SocketAddr {
        self.ingest_addr
    }

    /// Block until a termination signal, or until either unit exits on its own.
    pub async fn wait(mut self) {
        tokio::select! {
            _ = signals::wait_for_signal() => {}
            Some(exited) = self.tasks.join_next() => {
                tracing::warn!(unit = ?exited, "Server unit exited unexpectedly");
            }
        }
        self.stop().await;
    }

    /// Signal both units and wait until they have released their sockets.
    pub async fn stop(mut self) {
        self.shutdown.trigger();
        while let Some(result) = self.tasks.join_next().await {
            match result {
                Ok(unit) => tracing::info!(unit, "Server unit stopped"),
                Err(e) => tracing::error!(error = %e, "Server unit panicked"),
            }
        }
    }
}
