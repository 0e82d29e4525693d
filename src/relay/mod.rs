//! Fire-and-forget relay from the HTTP layer to the ingest server.
//!
//! # Data Flow
//! ```text
//! POST body (bytes)
//!     → client.rs (short-lived UDP socket, one send_to, socket dropped)
//!     → datagram on the loopback
//!     → ingest server
//! ```
//!
//! # Delivery
//! At-most-once and unordered relative to HTTP arrival. A datagram may be
//! dropped by the transport or sent before the ingest server is listening;
//! neither case is detected or retried.

pub mod client;

pub use client::{RelayClient, RelayError};
