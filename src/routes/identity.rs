// ABOUTME: Caller identity resolution for meal and profile routes
// ABOUTME: Reads the x-user-id header and falls back to the configured default user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::environment::ServerConfig;
use crate::constants::headers;
use axum::http::HeaderMap;
use macro_tracker_core::errors::{AppError, AppResult};
use macro_tracker_core::models::UserId;
use tracing::Span;

/// Resolve the user a request acts on
///
/// The `x-user-id` header must hold a positive integer. Without the header
/// the configured default user is used. The resolved id is recorded on the
/// current request span.
///
/// # Errors
///
/// Returns `InvalidInput` if the header is present but malformed
pub fn resolve_user_id(request_headers: &HeaderMap, config: &ServerConfig) -> AppResult<UserId> {
    let user_id = match request_headers.get(headers::USER_ID) {
        None => config.default_user_id,
        Some(value) => {
            let raw = value
                .to_str()
                .map_err(|_| AppError::invalid_input("x-user-id header is not valid text"))?;
            match raw.trim().parse::<i64>() {
                Ok(id) if id > 0 => UserId(id),
                _ => {
                    return Err(AppError::invalid_input(format!(
                        "x-user-id header must be a positive integer, got '{raw}'"
                    )))
                }
            }
        }
    };

    Span::current().record("user_id", user_id.0);
    Ok(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use macro_tracker_core::errors::ErrorCode;

    #[test]
    fn test_default_user_without_header() {
        let config = ServerConfig::default();
        let user = resolve_user_id(&HeaderMap::new(), &config).unwrap();
        assert_eq!(user, config.default_user_id);
    }

    #[test]
    fn test_header_overrides_default() {
        let mut request_headers = HeaderMap::new();
        request_headers.insert(headers::USER_ID, HeaderValue::from_static(" 42 "));
        let user = resolve_user_id(&request_headers, &ServerConfig::default()).unwrap();
        assert_eq!(user, UserId(42));
    }

    #[test]
    fn test_malformed_header_rejected() {
        for raw in ["abc", "0", "-3"] {
            let mut request_headers = HeaderMap::new();
            request_headers.insert(headers::USER_ID, HeaderValue::from_static(raw));
            let err = resolve_user_id(&request_headers, &ServerConfig::default()).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidInput);
        }
    }
}
