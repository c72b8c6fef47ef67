// ABOUTME: Profile routes: read the stored profile and apply partial updates
// ABOUTME: Updates return the written columns, including recomputed metrics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::resources::ServerResources;
use crate::routes::identity::resolve_user_id;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use macro_tracker_core::errors::AppError;
use macro_tracker_core::profile::ProfileUpdate;
use std::sync::Arc;

/// Profile routes handler
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/profile",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .put(Self::handle_update),
            )
            .with_state(resources)
    }

    /// Handle GET /api/profile - Stored profile with age
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = resolve_user_id(&headers, &resources.config)?;
        let profile = resources.profile_service.get_profile(user_id).await?;

        Ok((StatusCode::OK, Json(profile)).into_response())
    }

    /// Handle PATCH/PUT /api/profile - Partial update
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<Json<ProfileUpdate>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let user_id = resolve_user_id(&headers, &resources.config)?;
        let Json(update) = body.map_err(|e| AppError::invalid_input(e.body_text()))?;

        let result = resources
            .profile_service
            .update_profile(user_id, &update)
            .await?;

        Ok((StatusCode::OK, Json(result)).into_response())
    }
}
