// ABOUTME: Data models for the meal log and profile views served by the HTTP layer
// ABOUTME: Re-exports the biometric models owned by the core crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Meal-log records live here; biometric types (`UserId`, `Sex`,
//! `ActivityLevel`) and profile reconciliation types live in
//! `macro_tracker_core` and are re-exported for convenience.

mod meal;
mod profile;

pub use macro_tracker_core::models::{ActivityLevel, Sex, UserId};
pub use meal::{DailyTotals, MealEntry, NewMealEntry};
pub use profile::{ProfileUpdateResult, ProfileView};
