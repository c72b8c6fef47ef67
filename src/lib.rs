// ABOUTME: Main library entry point for the macro tracker nutrition backend
// ABOUTME: Exposes configuration, persistence, food lookup, services and HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Macro Tracker
//!
//! A small personal nutrition-tracking backend. It proxies USDA `FoodData`
//! Central, keeps a per-day meal log, and stores a biometric profile whose
//! daily calorie target, BMI and body-fat estimate are recomputed whenever
//! their inputs change.
//!
//! ## Architecture
//!
//! - **Core** (`macro_tracker_core`): pure metrics calculator and profile reconciler
//! - **External**: USDA client behind the `FoodDataSource` trait
//! - **Database**: `SQLite` users and meal log via sqlx
//! - **Services**: profile and meal business logic
//! - **Routes**: axum handlers, CORS, tracing and request ids
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use macro_tracker::config::environment::ServerConfig;
//! use macro_tracker::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Macro tracker configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Configuration management
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// `SQLite` persistence for profiles and meals
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// External API clients (USDA `FoodData` Central)
pub mod external;

/// Production logging and structured output
pub mod logging;

/// HTTP middleware for CORS and request tracing
pub mod middleware;

/// Meal and profile data models
pub mod models;

/// Shared server resources
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Domain services
pub mod services;

pub use macro_tracker_core::{metrics, profile};
