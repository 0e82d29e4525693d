//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the form relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FormRelayConfig {
    /// HTTP front server (bind address, body limits).
    pub http: HttpConfig,

    /// Datagram ingest server.
    pub ingest: IngestConfig,

    /// Where the HTTP layer relays submissions to.
    pub relay: RelayConfig,

    /// Page documents and static content.
    pub site: SiteConfig,

    /// Persistent JSON store.
    pub store: StoreConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP front server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Largest accepted POST body. Must fit into a single ingest datagram.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            max_body_bytes: 8192,
            request_timeout_secs: 30,
        }
    }
}

/// Datagram ingest configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Bind address for the datagram socket.
    pub bind_address: String,

    /// Largest datagram accepted; longer ones are dropped.
    pub buffer_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            buffer_size: 8192,
        }
    }
}

/// Relay client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Destination of relayed submissions (the ingest server).
    pub target_address: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            target_address: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Page and static content configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory static files and page documents are served from.
    pub base_dir: String,

    /// Landing page served on `GET /`.
    pub index_page: String,

    /// Confirmation page served after a submission.
    pub message_page: String,

    /// Page served with 404.
    pub error_page: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_dir: "front-init".to_string(),
            index_page: "index.html".to_string(),
            message_page: "message.html".to_string(),
            error_page: "error.html".to_string(),
        }
    }
}

/// Persistent store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the JSON document holding all submissions.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "storage/data.json".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
