// ABOUTME: Unified error handling re-exported from the core crate
// ABOUTME: Keeps `crate::errors` paths stable for handlers, services and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Error codes, `AppError` and the JSON error body are defined in
//! `macro_tracker_core::errors`; the HTTP and database conversions are
//! enabled through that crate's `http-response` and `database-errors`
//! features.

pub use macro_tracker_core::errors::{
    AppError, AppResult, ErrorCode, ErrorResponse, ErrorResponseDetails,
};
