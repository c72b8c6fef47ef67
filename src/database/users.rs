// ABOUTME: User and profile database operations
// ABOUTME: Creates users, loads stored profiles and applies reconciled column changes

use super::Database;
use macro_tracker_core::errors::{AppError, AppResult};
use macro_tracker_core::models::{ActivityLevel, Sex, UserId};
use macro_tracker_core::profile::{ColumnValue, ProfileChanges, StoredProfile};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;
use tracing::debug;

impl Database {
    /// Create the users table holding raw profile fields and derived metrics
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT,
                email TEXT,
                date_of_birth TEXT,
                sex TEXT CHECK (sex IN ('male', 'female')),
                height_cm REAL,
                weight_kg REAL,
                activity_level TEXT CHECK (activity_level IN (
                    'sedentary', 'lightly_active', 'moderately_active', 'very_active', 'extra_active'
                )),
                daily_calorie_target REAL,
                bmi REAL,
                body_fat_pct REAL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Create a new user and return its id
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails
    pub async fn create_user(&self, name: Option<&str>, email: Option<&str>) -> AppResult<UserId> {
        let result = sqlx::query("INSERT INTO users (name, email) VALUES ($1, $2)")
            .bind(name)
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(UserId(result.last_insert_rowid()))
    }

    /// Make sure a user row exists for `user_id`
    ///
    /// Returns `true` when the row was created by this call.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails
    pub async fn ensure_user(&self, user_id: UserId) -> AppResult<bool> {
        let result = sqlx::query("INSERT OR IGNORE INTO users (id) VALUES ($1)")
            .bind(user_id.0)
            .execute(&self.pool)
            .await?;

        let created = result.rows_affected() > 0;
        if created {
            debug!(user.id = %user_id, "Created user row");
        }
        Ok(created)
    }

    /// Load the stored profile for a user
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a stored enum value is unreadable
    pub async fn get_profile(&self, user_id: UserId) -> AppResult<Option<StoredProfile>> {
        let row = sqlx::query(
            r"
            SELECT name, email, date_of_birth, sex, height_cm, weight_kg, activity_level,
                   daily_calorie_target, bmi, body_fat_pct
            FROM users WHERE id = $1
            ",
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_profile).transpose()
    }

    fn row_to_profile(row: &SqliteRow) -> AppResult<StoredProfile> {
        Ok(StoredProfile {
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            date_of_birth: row.try_get("date_of_birth")?,
            sex: parse_stored::<Sex>(row.try_get("sex")?)?,
            height_cm: row.try_get("height_cm")?,
            weight_kg: row.try_get("weight_kg")?,
            activity_level: parse_stored::<ActivityLevel>(row.try_get("activity_level")?)?,
            daily_calorie_target: row.try_get("daily_calorie_target")?,
            bmi: row.try_get("bmi")?,
            body_fat_pct: row.try_get("body_fat_pct")?,
        })
    }

    /// Write a reconciled change set in one UPDATE
    ///
    /// Columns absent from `changes` are left untouched. An empty change set
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no user row matches, or `DatabaseError`
    /// if the update fails
    pub async fn apply_profile_changes(
        &self,
        user_id: UserId,
        changes: &ProfileChanges,
    ) -> AppResult<()> {
        if changes.is_empty() {
            return Ok(());
        }

        // Column names come from the closed ProfileColumn set, never from input
        let assignments: Vec<String> = changes
            .iter()
            .enumerate()
            .map(|(index, (column, _))| format!("{} = ${}", column.as_str(), index + 1))
            .collect();
        let sql = format!(
            "UPDATE users SET {}, updated_at = CURRENT_TIMESTAMP WHERE id = ${}",
            assignments.join(", "),
            changes.len() + 1
        );

        let mut query = sqlx::query(&sql);
        for (_, value) in changes.iter() {
            query = match value {
                ColumnValue::Text(text) => query.bind(text.clone()),
                ColumnValue::Real(number) => query.bind(*number),
                ColumnValue::Date(date) => query.bind(*date),
            };
        }

        let result = query.bind(user_id.0).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id}")));
        }

        debug!(user.id = %user_id, columns = changes.len(), "Applied profile changes");
        Ok(())
    }
}

fn parse_stored<T>(raw: Option<String>) -> AppResult<Option<T>>
where
    T: FromStr<Err = AppError>,
{
    raw.map(|value| {
        value.parse::<T>().map_err(|e| {
            AppError::database(format!("Unreadable stored value '{value}': {}", e.message))
        })
    })
    .transpose()
}
