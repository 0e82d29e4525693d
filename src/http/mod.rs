//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, Content-Length checks)
//!     → handlers.rs (route by method + path)
//!         GET  → site.rs (page documents, static files)
//!         POST → relay::RelayClient (detached send)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod server;
pub mod site;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpError, HttpServer};
pub use site::{Page, Site};
