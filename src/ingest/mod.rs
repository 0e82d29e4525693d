//! Datagram ingest subsystem.
//!
//! # Data Flow
//! ```text
//! UDP datagram
//!     → server.rs (receive loop, size check)
//!     → store::Submission::decode
//!     → store::FormStore::merge
//! ```
//!
//! # States (per datagram)
//! ```text
//! Idle → Receiving → Merging → Idle
//! ```
//!
//! # Design Decisions
//! - One sequential loop: merges never overlap, so the store needs no lock
//! - Per-datagram errors are logged and the loop continues
//! - The loop ends only on the shutdown trigger; the socket is dropped on return

pub mod server;

pub use server::{IngestError, IngestServer, Ingested};
