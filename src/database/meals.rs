// ABOUTME: Meal log database operations
// ABOUTME: Stores meal entries and reads them back per user and day, with daily totals

use super::Database;
use crate::models::{DailyTotals, MealEntry, NewMealEntry};
use chrono::{NaiveDate, Utc};
use macro_tracker_core::errors::{AppError, AppResult};
use macro_tracker_core::models::UserId;
use sqlx::Row;

impl Database {
    /// Create the meal log table and its lookup index
    pub(super) async fn migrate_meals(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS meal_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                meal_type TEXT NOT NULL,
                food_name TEXT NOT NULL,
                fdc_id INTEGER,
                quantity_g REAL NOT NULL,
                calories REAL NOT NULL DEFAULT 0,
                protein REAL NOT NULL DEFAULT 0,
                carbs REAL NOT NULL DEFAULT 0,
                fat REAL NOT NULL DEFAULT 0,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_meal_entries_user_date ON meal_entries(user_id, date)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store a meal entry, defaulting its date to today
    ///
    /// Missing macros are stored as zero.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an out-of-range `fdc_id`, or `DatabaseError`
    /// if the insert fails
    pub async fn record_meal(&self, user_id: UserId, meal: &NewMealEntry) -> AppResult<MealEntry> {
        let date = meal.date.unwrap_or_else(|| Utc::now().date_naive());
        let fdc_id = meal
            .fdc_id
            .map(i64::try_from)
            .transpose()
            .map_err(|_| AppError::invalid_input("fdc_id is out of range"))?;

        let entry = sqlx::query_as::<_, MealEntry>(
            r"
            INSERT INTO meal_entries (
                user_id, date, meal_type, food_name, fdc_id, quantity_g,
                calories, protein, carbs, fat, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, user_id, date, meal_type, food_name, fdc_id, quantity_g,
                      calories, protein, carbs, fat, created_at
            ",
        )
        .bind(user_id.0)
        .bind(date)
        .bind(meal.meal_type.trim())
        .bind(meal.food_name.trim())
        .bind(fdc_id)
        .bind(meal.quantity_g)
        .bind(meal.calories.unwrap_or(0.0))
        .bind(meal.protein.unwrap_or(0.0))
        .bind(meal.carbs.unwrap_or(0.0))
        .bind(meal.fat.unwrap_or(0.0))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Meals a user logged on `date`, in insertion order
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails
    pub async fn meals_for_date(&self, user_id: UserId, date: NaiveDate) -> AppResult<Vec<MealEntry>> {
        let entries = sqlx::query_as::<_, MealEntry>(
            r"
            SELECT id, user_id, date, meal_type, food_name, fdc_id, quantity_g,
                   calories, protein, carbs, fat, created_at
            FROM meal_entries
            WHERE user_id = $1 AND date = $2
            ORDER BY id ASC
            ",
        )
        .bind(user_id.0)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Sum of a user's meals on `date`; all zero for a day with no entries
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails
    pub async fn daily_totals(&self, user_id: UserId, date: NaiveDate) -> AppResult<DailyTotals> {
        let row = sqlx::query(
            r"
            SELECT COUNT(*) AS entries,
                   COALESCE(SUM(calories), 0.0) AS calories,
                   COALESCE(SUM(protein), 0.0) AS protein,
                   COALESCE(SUM(carbs), 0.0) AS carbs,
                   COALESCE(SUM(fat), 0.0) AS fat
            FROM meal_entries
            WHERE user_id = $1 AND date = $2
            ",
        )
        .bind(user_id.0)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(DailyTotals {
            date,
            entries: row.try_get("entries")?,
            calories: row.try_get("calories")?,
            protein: row.try_get("protein")?,
            carbs: row.try_get("carbs")?,
            fat: row.try_get("fat")?,
        })
    }
}
