// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, in-memory databases and fully wired server resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `macro_tracker`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use anyhow::Result;
use macro_tracker::{
    config::environment::ServerConfig,
    database::Database,
    external::{FoodDataSource, MockUsdaClient},
    models::UserId,
    profile::RecomputePolicy,
    resources::ServerResources,
};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN, // Default to WARN for quiet tests
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    let database = Database::new("sqlite::memory:", 1).await?;
    Ok(database)
}

/// Configuration used by route tests
pub fn test_config(policy: RecomputePolicy) -> ServerConfig {
    ServerConfig {
        recompute_policy: policy,
        ..ServerConfig::default()
    }
}

/// Server resources around an in-memory database and the mock food source
///
/// The default user from the configuration is created.
pub async fn create_test_server_resources(
    policy: RecomputePolicy,
) -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    let config = test_config(policy);
    database.ensure_user(config.default_user_id).await?;

    let food_source: Arc<dyn FoodDataSource> = Arc::new(MockUsdaClient::new());
    Ok(Arc::new(ServerResources::new(
        database,
        Some(food_source),
        Arc::new(config),
    )))
}

/// Server resources with no food source configured
pub async fn create_test_server_resources_without_food_api() -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    let config = test_config(RecomputePolicy::PayloadOnly);
    database.ensure_user(config.default_user_id).await?;
    Ok(Arc::new(ServerResources::new(database, None, Arc::new(config))))
}

/// Create a second user for isolation tests
pub async fn create_test_user(database: &Database) -> Result<UserId> {
    Ok(database
        .create_user(Some("Test User"), Some("test@example.com"))
        .await?)
}
