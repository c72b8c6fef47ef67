// ABOUTME: System-wide constants and defaults for the macro tracker server
// ABOUTME: Environment variable names, default ports, limits and upstream API settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Hardcoded defaults and the names of the environment variables that override them.

/// Service identification for logs and banners
pub mod service_names {
    /// Name reported in structured logs
    pub const MACRO_TRACKER_SERVER: &str = "macro-tracker-server";
}

/// Environment variable names
pub mod env_vars {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Database connection URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Maximum pooled database connections
    pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
    /// USDA `FoodData` Central API key
    pub const USDA_API_KEY: &str = "USDA_API_KEY";
    /// USDA API base URL override
    pub const USDA_BASE_URL: &str = "USDA_BASE_URL";
    /// USDA response cache lifetime in seconds
    pub const USDA_CACHE_TTL_SECS: &str = "USDA_CACHE_TTL_SECS";
    /// USDA outbound request budget per minute
    pub const USDA_RATE_LIMIT_PER_MINUTE: &str = "USDA_RATE_LIMIT_PER_MINUTE";
    /// Comma-separated CORS origins, or `*`
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
    /// User id used when a request carries no identity header
    pub const DEFAULT_USER_ID: &str = "DEFAULT_USER_ID";
    /// `payload_only` or `merge_stored`
    pub const PROFILE_RECOMPUTE_POLICY: &str = "PROFILE_RECOMPUTE_POLICY";
    /// Deployment environment (development, production, testing)
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Default configuration values
pub mod defaults {
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8050;
    /// Default `SQLite` database location
    pub const DATABASE_URL: &str = "sqlite:./data/macro_tracker.db";
    /// Default connection pool ceiling
    pub const DATABASE_MAX_CONNECTIONS: u32 = 10;
    /// Default single-user id
    pub const DEFAULT_USER_ID: i64 = 1;
    /// Default CORS policy
    pub const CORS_ALLOWED_ORIGINS: &str = "*";
}

/// USDA `FoodData` Central API settings
pub mod usda {
    /// Public API base URL
    pub const BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
    /// Cache results for 24 hours
    pub const CACHE_TTL_SECS: u64 = 86_400;
    /// USDA allows bursts well above this; stay polite
    pub const RATE_LIMIT_PER_MINUTE: u32 = 30;
    /// Largest page size the search endpoint accepts
    pub const MAX_PAGE_SIZE: u32 = 200;
    /// Page size used when the client does not ask for one
    pub const DEFAULT_PAGE_SIZE: u32 = 25;
    /// Service label used in error messages
    pub const SERVICE_NAME: &str = "USDA API";
}

/// HTTP header names
pub mod headers {
    /// Caller identity header
    pub const USER_ID: &str = "x-user-id";
    /// Request correlation header
    pub const REQUEST_ID: &str = "x-request-id";
}
