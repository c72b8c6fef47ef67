// ABOUTME: Meal logging business logic
// ABOUTME: Validates entries, back-fills macros from the food source and stores them per user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::database::Database;
use crate::external::FoodDataSource;
use crate::logging::AppLogger;
use crate::models::{DailyTotals, MealEntry, NewMealEntry};
use chrono::NaiveDate;
use macro_tracker_core::errors::{AppError, AppResult};
use macro_tracker_core::models::UserId;
use std::sync::Arc;
use tracing::{debug, warn};

/// Meal log operations scoped to an explicit user
#[derive(Clone)]
pub struct MealService {
    database: Database,
    food_source: Option<Arc<dyn FoodDataSource>>,
}

impl MealService {
    /// Create a service; `food_source` enables macro back-filling by `fdc_id`
    #[must_use]
    pub fn new(database: Database, food_source: Option<Arc<dyn FoodDataSource>>) -> Self {
        Self {
            database,
            food_source,
        }
    }

    /// Validate and store a meal entry
    ///
    /// When macros are missing and `fdc_id` is set, the per-100 g macros of
    /// that food are scaled to the portion. Without a food source the missing
    /// macros are stored as zero.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an invalid entry, `ResourceNotFound` for an
    /// unknown user or food, or the food source / database error
    pub async fn record_meal(&self, user_id: UserId, meal: NewMealEntry) -> AppResult<MealEntry> {
        meal.validate()?;
        self.require_user(user_id).await?;

        let mut meal = meal;
        if let (true, Some(fdc_id)) = (meal.has_missing_macros(), meal.fdc_id) {
            if let Some(source) = &self.food_source {
                let food = source.get_food_macros(fdc_id).await?;
                debug!(fdc_id, food = %food.description, "Back-filled meal macros");
                meal.fill_missing_macros(food.macros);
            } else {
                warn!(fdc_id, "No food source configured; missing macros stored as zero");
            }
        }

        let entry = self.database.record_meal(user_id, &meal).await?;
        AppLogger::log_meal_recorded(user_id, entry.id, entry.calories);
        Ok(entry)
    }

    /// Entries for one day, in insertion order
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails
    pub async fn meals_for_date(&self, user_id: UserId, date: NaiveDate) -> AppResult<Vec<MealEntry>> {
        self.database.meals_for_date(user_id, date).await
    }

    /// Totals for one day
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails
    pub async fn daily_totals(&self, user_id: UserId, date: NaiveDate) -> AppResult<DailyTotals> {
        self.database.daily_totals(user_id, date).await
    }

    async fn require_user(&self, user_id: UserId) -> AppResult<()> {
        if self.database.get_profile(user_id).await?.is_none() {
            return Err(AppError::not_found(format!("User {user_id}")));
        }
        Ok(())
    }
}
