// ABOUTME: Core types for the macro tracker nutrition backend
// ABOUTME: Foundation crate with error handling, biometric models, metrics and profile reconciliation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Macro Tracker Core
//!
//! Foundation crate for the macro tracker backend. Everything here is pure:
//! no storage, no network, no clocks. The server crate feeds already
//! deserialized inputs in and persists whatever comes out.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **models**: User identity and the closed biometric enumerations
//! - **metrics**: BMR/TDEE, BMI and body-fat formulas
//! - **profile**: Partial profile updates turned into column/value changes

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Biometric models (`Sex`, `ActivityLevel`, `UserId`)
pub mod models;

/// Body-composition metrics calculator
pub mod metrics;

/// Profile reconciliation for partial updates
pub mod profile;
