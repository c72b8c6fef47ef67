// ABOUTME: Shared server resources handed to every route as axum state
// ABOUTME: Owns the database handle, optional food source, configuration and services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Server resources
//!
//! Built once at startup and shared behind an `Arc`. Nothing in here is
//! global: tests build their own instance around an in-memory database and a
//! mock food source.

use crate::config::environment::ServerConfig;
use crate::constants::usda;
use crate::database::Database;
use crate::external::FoodDataSource;
use crate::services::{MealService, ProfileService};
use macro_tracker_core::errors::{AppError, AppResult};
use std::sync::Arc;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Database handle (cheap to clone, shares one pool)
    pub database: Database,
    /// Food-composition lookup; `None` when no USDA API key is configured
    pub food_source: Option<Arc<dyn FoodDataSource>>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Profile reads and updates
    pub profile_service: ProfileService,
    /// Meal logging
    pub meal_service: MealService,
}

impl ServerResources {
    /// Create new server resources with proper Arc sharing
    #[must_use]
    pub fn new(
        database: Database,
        food_source: Option<Arc<dyn FoodDataSource>>,
        config: Arc<ServerConfig>,
    ) -> Self {
        let profile_service = ProfileService::new(database.clone(), config.recompute_policy);
        let meal_service = MealService::new(database.clone(), food_source.clone());

        Self {
            database,
            food_source,
            config,
            profile_service,
            meal_service,
        }
    }

    /// Food source, or `ExternalServiceUnavailable` when none is configured
    ///
    /// # Errors
    ///
    /// Returns `ExternalServiceUnavailable` if no USDA API key was configured
    pub fn require_food_source(&self) -> AppResult<&Arc<dyn FoodDataSource>> {
        self.food_source
            .as_ref()
            .ok_or_else(|| AppError::service_unavailable(usda::SERVICE_NAME))
    }
}
