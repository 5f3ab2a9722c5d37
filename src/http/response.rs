//! Response construction.
//!
//! # Design Decisions
//! - Fallback pages keep the 404 status; only the body is replaced
//! - Upstream failures map to 502, upstream timeouts to 504

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::fallback::FallbackContent;

/// Used when the fetched response carried no usable `Content-Type`.
const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// A 404 response carrying fetched fallback content, bytes untouched.
pub fn fallback_page(content: FallbackContent) -> Response {
    let content_type = content
        .content_type
        .as_deref()
        .and_then(|v| HeaderValue::from_str(v).ok())
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    (
        StatusCode::NOT_FOUND,
        [(CONTENT_TYPE, content_type)],
        Body::from(content.body),
    )
        .into_response()
}

pub fn bad_gateway() -> Response {
    (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
}

pub fn gateway_timeout() -> Response {
    (StatusCode::GATEWAY_TIMEOUT, "Upstream request timed out").into_response()
}
