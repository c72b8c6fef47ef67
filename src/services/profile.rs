// ABOUTME: Profile business logic: load, reconcile and persist partial profile updates
// ABOUTME: Bridges the pure reconciler in the core crate to the users table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::database::Database;
use crate::logging::AppLogger;
use crate::models::{ProfileUpdateResult, ProfileView};
use chrono::{NaiveDate, Utc};
use macro_tracker_core::errors::{AppError, AppResult};
use macro_tracker_core::models::UserId;
use macro_tracker_core::profile::{
    ProfileChanges, ProfileReconciler, ProfileUpdate, ReconcileOutcome, RecomputePolicy,
};
use tracing::debug;

/// Profile operations scoped to an explicit user
#[derive(Clone)]
pub struct ProfileService {
    database: Database,
    reconciler: ProfileReconciler,
}

impl ProfileService {
    /// Create a service using `policy` for derived-metric recomputation
    #[must_use]
    pub const fn new(database: Database, policy: RecomputePolicy) -> Self {
        Self {
            database,
            reconciler: ProfileReconciler::new(policy),
        }
    }

    /// Active recompute policy
    #[must_use]
    pub const fn policy(&self) -> RecomputePolicy {
        self.reconciler.policy()
    }

    /// Stored profile with age derived as of today
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the user does not exist
    pub async fn get_profile(&self, user_id: UserId) -> AppResult<ProfileView> {
        let profile = self
            .database
            .get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id}")))?;
        // A stored future birth date cannot come from an update; report no age
        let age = profile.age_on(today()).ok().flatten();

        Ok(ProfileView {
            user_id,
            profile,
            age,
        })
    }

    /// Apply a partial update using today's date for age
    ///
    /// # Errors
    ///
    /// See [`ProfileService::update_profile_on`]
    pub async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> AppResult<ProfileUpdateResult> {
        self.update_profile_on(user_id, update, today()).await
    }

    /// Apply a partial update as of `today`
    ///
    /// Invalid input aborts before anything is written. A no-op update never
    /// touches the database.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a bad date of birth, sex or activity level,
    /// `ResourceNotFound` if the user does not exist, or `DatabaseError`
    pub async fn update_profile_on(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
        today: NaiveDate,
    ) -> AppResult<ProfileUpdateResult> {
        let stored = match self.reconciler.policy() {
            RecomputePolicy::MergeStored if update.touches_biometrics() => Some(
                self.database
                    .get_profile(user_id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("User {user_id}")))?,
            ),
            _ => None,
        };

        match self.reconciler.reconcile(update, stored.as_ref(), today)? {
            ReconcileOutcome::NoOp => {
                debug!(user.id = %user_id, "Profile update was a no-op");
                Ok(ProfileUpdateResult {
                    changed: false,
                    updated: ProfileChanges::new(),
                })
            }
            ReconcileOutcome::Changes(changes) => {
                self.database
                    .apply_profile_changes(user_id, &changes)
                    .await?;

                let columns: Vec<&str> = changes.iter().map(|(column, _)| column.as_str()).collect();
                let derived = changes
                    .iter()
                    .filter(|(column, _)| column.is_derived())
                    .count();
                AppLogger::log_profile_update(user_id, &columns, derived);

                Ok(ProfileUpdateResult {
                    changed: true,
                    updated: changes,
                })
            }
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
