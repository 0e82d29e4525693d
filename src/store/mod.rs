//! Submission decoding and persistence.
//!
//! # Data Flow
//! ```text
//! raw datagram bytes
//!     → form.rs (split pairs, percent/plus decode, reject malformed)
//!     → Submission
//!     → file.rs (load document → insert timestamp key → atomic rewrite)
//! ```
//!
//! # Design Decisions
//! - A malformed body never reaches the store
//! - Read-modify-write of the whole document on every merge
//! - Single writer by ownership: only the ingest server holds a `FormStore`

pub mod file;
pub mod form;

pub use file::{timestamp_key, FormStore, StoreError, StoreRecord};
pub use form::{FormError, Submission};
