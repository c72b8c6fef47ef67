// ABOUTME: HTTP middleware for CORS, request tracing and request-id propagation
// ABOUTME: Builds the tower layers wrapped around every route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod cors;
pub mod tracing;

// CORS configuration
pub use cors::setup_cors;

// Request tracing
pub use tracing::{create_request_span, record_response};
