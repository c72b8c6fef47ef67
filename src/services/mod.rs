// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Profile reconciliation and meal logging against the database and food source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Handlers resolve the caller and parse the request; everything else lives
//! here so it can be exercised without HTTP.

/// Meal logging with optional macro lookup by USDA id
pub mod meals;

/// Profile reads and partial updates with derived-metric recomputation
pub mod profile;

pub use meals::MealService;
pub use profile::ProfileService;
