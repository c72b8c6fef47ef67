// ABOUTME: External API client modules (USDA FoodData Central)
// ABOUTME: Food search, nutrient lookup and macro extraction behind a swappable trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! External API Clients
//!
//! This module contains clients for the external APIs used by the macro tracker.

pub mod usda_client;

// Re-export commonly used types
pub use usda_client::{
    FoodDataSource, FoodDetails, FoodMacros, FoodNutrient, FoodSearchResult, MacroNutrients,
    MockUsdaClient, UsdaClient, UsdaClientConfig,
};
