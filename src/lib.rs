//! Form relay library.
//!
//! An HTTP front server accepts form submissions and relays the raw body as
//! a datagram to an ingest server, which merges it into a JSON store.

pub mod config;
pub mod http;
pub mod ingest;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod store;

pub use config::FormRelayConfig;
pub use http::HttpServer;
pub use ingest::IngestServer;
pub use lifecycle::Shutdown;
pub use relay::RelayClient;
pub use store::{FormStore, Submission};
