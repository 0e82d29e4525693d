//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges
//! - Check that relayed bodies always fit the ingest buffer
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FormRelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::FormRelayConfig;

/// Largest payload a single UDP datagram can carry over IPv4.
pub const MAX_DATAGRAM_PAYLOAD: usize = 65_507;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("ingest.buffer_size {0} exceeds the 65507 byte datagram limit")]
    BufferTooLarge(usize),

    #[error("http.max_body_bytes ({body}) exceeds ingest.buffer_size ({buffer})")]
    BodyExceedsBuffer { body: usize, buffer: usize },

    #[error("observability.log_format must be 'pretty' or 'json', got '{0}'")]
    UnknownLogFormat(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Check every semantic rule and collect all violations.
pub fn validate_config(config: &FormRelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let addresses = [
        ("http.bind_address", &config.http.bind_address),
        ("ingest.bind_address", &config.ingest.bind_address),
        ("relay.target_address", &config.relay.target_address),
    ];
    for (field, value) in addresses {
        if value.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidAddress {
                field,
                value: value.clone(),
            });
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.http.max_body_bytes == 0 {
        errors.push(ValidationError::Zero { field: "http.max_body_bytes" });
    }
    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "http.request_timeout_secs" });
    }
    if config.ingest.buffer_size == 0 {
        errors.push(ValidationError::Zero { field: "ingest.buffer_size" });
    } else if config.ingest.buffer_size > MAX_DATAGRAM_PAYLOAD {
        errors.push(ValidationError::BufferTooLarge(config.ingest.buffer_size));
    }

    if config.http.max_body_bytes > config.ingest.buffer_size {
        errors.push(ValidationError::BodyExceedsBuffer {
            body: config.http.max_body_bytes,
            buffer: config.ingest.buffer_size,
        });
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::UnknownLogFormat(other.to_string())),
    }

    if config.store.path.trim().is_empty() {
        errors.push(ValidationError::Empty("store.path"));
    }
    if config.site.base_dir.trim().is_empty() {
        errors.push(ValidationError::Empty("site.base_dir"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
