// ABOUTME: Response shapes for the profile endpoints
// ABOUTME: Stored profile with derived age, and the reconciled change set of an update
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use macro_tracker_core::models::UserId;
use macro_tracker_core::profile::{ProfileChanges, StoredProfile};
use serde::Serialize;

/// Stored profile as returned by `GET /api/profile`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    /// Profile owner
    pub user_id: UserId,
    /// Persisted columns
    #[serde(flatten)]
    pub profile: StoredProfile,
    /// Whole years since the date of birth
    pub age: Option<u32>,
}

/// Outcome of a profile update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdateResult {
    /// False when the update was a no-op
    pub changed: bool,
    /// Columns written, including recomputed metrics
    pub updated: ProfileChanges,
}
