//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Create store file → Bind ingest socket → Bind HTTP listener → Spawn both units
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Trigger → HTTP stops accepting, ingest loop exits → Sockets dropped
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The ingest socket is bound before the HTTP listener, so relayed
//!   datagrams have a receiver as soon as traffic is accepted
//! - Either unit exiting on its own also brings the process down

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use startup::{start, Running, StartupError};
