//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → FormRelayConfig (validated, immutable)
//!     → sections handed to the HTTP, relay and ingest units at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::FormRelayConfig;
pub use schema::{HttpConfig, IngestConfig, ObservabilityConfig, RelayConfig, SiteConfig, StoreConfig};
pub use validation::{validate_config, ValidationError};
