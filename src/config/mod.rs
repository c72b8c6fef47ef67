// ABOUTME: Configuration module root for environment-driven server settings
// ABOUTME: Re-exports the server configuration and the typed database URL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Database URL and pool configuration
pub mod database;
/// Environment-based server configuration
pub mod environment;

pub use database::{DatabaseConfig, DatabaseUrl};
pub use environment::{CorsConfig, Environment, FoodApiConfig, ServerConfig};
