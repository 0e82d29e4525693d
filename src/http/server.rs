//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, metrics)
//! - Bind server to listener
//! - Stop accepting once shutdown is triggered

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::FormRelayConfig;
use crate::http::handlers;
use crate::http::request::X_REQUEST_ID;
use crate::http::site::Site;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::relay::{RelayClient, RelayError};

/// Error type for HTTP server construction.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("site base directory '{path}' unavailable: {source}")]
    Site {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Relay(#[from] RelayError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<Site>,
    pub relay: RelayClient,
    pub max_body_bytes: usize,
}

/// HTTP front server.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &FormRelayConfig) -> Result<Self, HttpError> {
        let site = Site::from_config(&config.site).map_err(|source| HttpError::Site {
            path: config.site.base_dir.clone(),
            source,
        })?;
        let relay = RelayClient::from_config(&config.relay)?;

        let state = AppState {
            site: Arc::new(site),
            relay,
            max_body_bytes: config.http.max_body_bytes,
        };

        let router = Self::build_router(config, state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &FormRelayConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::index).post(handlers::submit))
            .route("/message.html", get(handlers::message).post(handlers::submit))
            .route("/{*path}", get(handlers::static_file).post(handlers::submit))
            .with_state(state)
            .layer(middleware::from_fn(track_requests))
            .layer(TimeoutLayer::new(Duration::from_secs(config.http.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// The fully layered router, for driving requests in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until shutdown is triggered.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.recv().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let response = next.run(request).await;
    metrics::record_http_request(&method, response.status().as_u16());
    response
}
