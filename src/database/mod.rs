// ABOUTME: SQLite persistence for user profiles and the meal log
// ABOUTME: Owns the connection pool, runs migrations and closes the pool on shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! The pool is an explicitly owned handle: handlers borrow a connection per
//! query and it returns to the pool when the query future completes or is
//! dropped. [`Database::close`] is called once on shutdown.

mod meals;
mod users;

use macro_tracker_core::errors::AppResult;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use tracing::{debug, info};

/// Database manager for profiles and meal entries
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection pool and run migrations
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated
    pub async fn new(database_url: &str, max_connections: u32) -> AppResult<Self> {
        let is_memory = database_url.contains(":memory:");

        let pool = if is_memory {
            // Every connection to :memory: is a separate database
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(database_url)
                .await?
        } else {
            // Ensure SQLite creates the database file if it doesn't exist
            let connection_options = if database_url.starts_with("sqlite:") {
                format!("{database_url}?mode=rwc")
            } else {
                format!("sqlite:{database_url}?mode=rwc")
            };
            SqlitePoolOptions::new()
                .max_connections(max_connections.max(1))
                .connect(&connection_options)
                .await?
        };

        let db = Self { pool };
        db.migrate().await?;

        info!(
            max_connections = if is_memory { 1 } else { max_connections },
            in_memory = is_memory,
            "Database initialized"
        );
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a table or index cannot be created
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_meals().await?;
        debug!("Database migrations complete");
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }

    /// Whether [`Database::close`] has been called
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}
