//! Request identification and header helpers.
//!
//! # Design Decisions
//! - Request ID added as early as possible (outermost layer) for tracing
//! - An incoming `x-request-id` is kept; otherwise a UUID v4 is generated
//! - Body size is decided from `Content-Length` before the body is read

use axum::http::{header, HeaderMap, HeaderName, StatusCode};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation ID of a request, or `"unknown"` outside the request-id layer.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Declared body length.
///
/// A missing header maps to 411, an unparseable one to 400.
pub fn content_length(headers: &HeaderMap) -> Result<usize, StatusCode> {
    let value = headers
        .get(header::CONTENT_LENGTH)
        .ok_or(StatusCode::LENGTH_REQUIRED)?;

    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .ok_or(StatusCode::BAD_REQUEST)
}
