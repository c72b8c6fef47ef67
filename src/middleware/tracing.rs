// ABOUTME: Request tracing middleware for correlation and structured logging
// ABOUTME: Creates one span per HTTP request carrying the request id, caller and outcome

use crate::constants::headers;
use http::{Request, Response};
use std::time::Duration;
use tracing::{field, info, Span};

/// Create a tracing span for an HTTP request
///
/// `user_id` is filled in once the caller's identity is resolved.
pub fn create_request_span<B>(request: &Request<B>) -> Span {
    let request_id = request
        .headers()
        .get(headers::REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
        user_id = field::Empty,
        status_code = field::Empty,
        duration_ms = field::Empty,
    )
}

/// Record the response status and latency on the request span
pub fn record_response<B>(response: &Response<B>, latency: Duration, span: &Span) {
    let duration_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
    span.record("status_code", response.status().as_u16());
    span.record("duration_ms", duration_ms);
    info!(
        status = response.status().as_u16(),
        duration_ms, "Request completed"
    );
}
