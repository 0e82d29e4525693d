//! Request handlers.
//!
//! # Routing
//! ```text
//! GET  /               → landing page (200, text/html)
//! GET  /message.html   → confirmation page (200, text/html)
//! GET  /<path>         → static file (200, inferred type) or error page (404)
//! POST /<any path>     → read body, spawn relay, confirmation page (200)
//! ```
//!
//! The confirmation page only says the submission was accepted for relay.
//! Whether it reaches the store is decided later by the ingest server.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::http::request::{content_length, request_id};
use crate::http::server::AppState;
use crate::http::site::Page;

pub async fn index(State(state): State<AppState>) -> Response {
    state.site.page(Page::Index, StatusCode::OK).await
}

pub async fn message(State(state): State<AppState>) -> Response {
    state.site.page(Page::Message, StatusCode::OK).await
}

pub async fn static_file(State(state): State<AppState>, uri: Uri) -> Response {
    state.site.static_file(uri.path()).await
}

/// Accept a form submission and hand the raw body to the relay.
pub async fn submit(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request_id(request.headers()).to_string();
    let path = request.uri().path().to_string();

    let declared = match content_length(request.headers()) {
        Ok(len) => len,
        Err(status) => {
            tracing::warn!(request_id = %request_id, path = %path, status = %status, "Submission without usable Content-Length");
            return (status, "A valid Content-Length header is required").into_response();
        }
    };

    if declared > state.max_body_bytes {
        tracing::warn!(
            request_id = %request_id,
            declared,
            limit = state.max_body_bytes,
            "Submission too large"
        );
        return (StatusCode::PAYLOAD_TOO_LARGE, "Submission too large").into_response();
    }

    let body = match axum::body::to_bytes(request.into_body(), declared).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to read submission body");
            return (StatusCode::BAD_REQUEST, "Failed to read request body").into_response();
        }
    };

    tracing::debug!(request_id = %request_id, path = %path, bytes = body.len(), "Submission received");
    state.relay.spawn_send(body, request_id);

    state.site.page(Page::Message, StatusCode::OK).await
}
