// ABOUTME: Meal log records: incoming entries, stored rows and per-day totals
// ABOUTME: Validation and macro back-filling for entries that reference a USDA food
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::external::MacroNutrients;
use chrono::{DateTime, NaiveDate, Utc};
use macro_tracker_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Meal entry as submitted by a client
///
/// Macros are for the whole portion. Any macro left out is taken from the
/// referenced USDA food when `fdc_id` is set, otherwise stored as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMealEntry {
    /// Day the meal belongs to; today when absent
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Free-form slot such as breakfast, lunch, dinner or snack
    pub meal_type: String,
    /// Food description
    #[serde(alias = "food")]
    pub food_name: String,
    /// USDA `FoodData` Central id, when the food came from a search
    #[serde(default)]
    pub fdc_id: Option<u64>,
    /// Portion size in grams
    pub quantity_g: f64,
    /// Energy in kcal
    #[serde(default)]
    pub calories: Option<f64>,
    /// Protein in grams
    #[serde(default)]
    pub protein: Option<f64>,
    /// Carbohydrates in grams
    #[serde(default)]
    pub carbs: Option<f64>,
    /// Fat in grams
    #[serde(default)]
    pub fat: Option<f64>,
}

impl NewMealEntry {
    /// Reject entries that cannot be stored
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank meal type or food name, a
    /// non-positive portion, or a negative or non-finite macro value
    pub fn validate(&self) -> AppResult<()> {
        if self.meal_type.trim().is_empty() {
            return Err(AppError::invalid_input("meal_type cannot be empty"));
        }
        if self.food_name.trim().is_empty() {
            return Err(AppError::invalid_input("food_name cannot be empty"));
        }
        if !self.quantity_g.is_finite() || self.quantity_g <= 0.0 {
            return Err(AppError::invalid_input(format!(
                "quantity_g must be a positive number, got {}",
                self.quantity_g
            )));
        }
        for (field, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
        ] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(AppError::invalid_input(format!(
                        "{field} must be a non-negative number, got {value}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Whether any macro was left out
    #[must_use]
    pub const fn has_missing_macros(&self) -> bool {
        self.calories.is_none()
            || self.protein.is_none()
            || self.carbs.is_none()
            || self.fat.is_none()
    }

    /// Fill macros that were left out from a per-100 g profile
    pub fn fill_missing_macros(&mut self, per_100g: MacroNutrients) {
        let portion = per_100g.scaled_to(self.quantity_g);
        self.calories.get_or_insert(portion.calories);
        self.protein.get_or_insert(portion.protein);
        self.carbs.get_or_insert(portion.carbs);
        self.fat.get_or_insert(portion.fat);
    }
}

/// Stored meal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MealEntry {
    /// Row id, increasing in insertion order
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Day the meal belongs to
    pub date: NaiveDate,
    /// Meal slot
    pub meal_type: String,
    /// Food description
    pub food_name: String,
    /// USDA `FoodData` Central id
    pub fdc_id: Option<i64>,
    /// Portion size in grams
    pub quantity_g: f64,
    /// Energy in kcal
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Fat in grams
    pub fat: f64,
    /// Insertion timestamp
    pub created_at: DateTime<Utc>,
}

/// Sum of one user's meals for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    /// Day summed
    pub date: NaiveDate,
    /// Number of entries
    pub entries: i64,
    /// Energy in kcal
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Fat in grams
    pub fat: f64,
}
