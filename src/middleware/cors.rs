// ABOUTME: CORS middleware configuration for HTTP API endpoints
// ABOUTME: Provides Cross-Origin Resource Sharing setup for the browser front end
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::environment::ServerConfig;
use crate::constants::headers;
use http::{header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Configure CORS settings for the API
///
/// Configures cross-origin requests based on `CORS_ALLOWED_ORIGINS`.
/// Supports both wildcard ("*") for development and specific origin lists for production.
///
/// # Examples
///
/// ```bash
/// # Allow all origins (development)
/// export CORS_ALLOWED_ORIGINS="*"
///
/// # Allow specific origins (production)
/// export CORS_ALLOWED_ORIGINS="https://app.example.com,https://admin.example.com"
/// ```
#[must_use]
pub fn setup_cors(config: &ServerConfig) -> CorsLayer {
    let allow_origin = parse_allowed_origins(&config.cors.allowed_origins)
        .map_or_else(AllowOrigin::any, AllowOrigin::list);

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static(headers::USER_ID),
            HeaderName::from_static(headers::REQUEST_ID),
        ])
        .expose_headers([HeaderName::from_static(headers::REQUEST_ID)])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::OPTIONS,
        ])
}

/// Explicit origin list, or `None` for "any origin"
///
/// An empty value, `*`, or a list with no parseable entry all mean any origin.
fn parse_allowed_origins(raw: &str) -> Option<Vec<HeaderValue>> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "*" {
        return None;
    }

    let origins: Vec<HeaderValue> = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        None
    } else {
        Some(origins)
    }
}
