// ABOUTME: Meal log routes: record entries and read them back per day
// ABOUTME: Every operation is scoped to the caller resolved from the request headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::models::{MealEntry, NewMealEntry};
use crate::resources::ServerResources;
use crate::routes::identity::resolve_user_id;
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use macro_tracker_core::errors::{AppError, AppResult};
use macro_tracker_core::profile::parse_iso_date;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query parameters selecting a day
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// `YYYY-MM-DD`; today when absent
    pub date: Option<String>,
}

impl DateQuery {
    fn resolve(&self) -> AppResult<NaiveDate> {
        match self.date.as_deref() {
            None | Some("") => Ok(Utc::now().date_naive()),
            Some(raw) => parse_iso_date("date", raw),
        }
    }
}

/// Meals for one day
#[derive(Debug, Serialize, Deserialize)]
pub struct MealListResponse {
    /// Day listed
    pub date: NaiveDate,
    /// Entries in insertion order
    pub meals: Vec<MealEntry>,
}

/// Meal routes handler
pub struct MealRoutes;

impl MealRoutes {
    /// Create all meal log routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/meals",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route("/api/meals/summary", get(Self::handle_summary))
            .with_state(resources)
    }

    /// Handle POST /api/meals - Record a meal
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<Json<NewMealEntry>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let user_id = resolve_user_id(&headers, &resources.config)?;
        let Json(meal) = body.map_err(|e| AppError::invalid_input(e.body_text()))?;

        let entry = resources.meal_service.record_meal(user_id, meal).await?;

        Ok((StatusCode::CREATED, Json(entry)).into_response())
    }

    /// Handle GET /api/meals - Meals for one day
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Result<Query<DateQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let user_id = resolve_user_id(&headers, &resources.config)?;
        let Query(query) = query.map_err(|e| AppError::invalid_input(e.body_text()))?;
        let date = query.resolve()?;

        let meals = resources.meal_service.meals_for_date(user_id, date).await?;

        Ok((StatusCode::OK, Json(MealListResponse { date, meals })).into_response())
    }

    /// Handle GET /api/meals/summary - Daily macro totals
    async fn handle_summary(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Result<Query<DateQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let user_id = resolve_user_id(&headers, &resources.config)?;
        let Query(query) = query.map_err(|e| AppError::invalid_input(e.body_text()))?;
        let date = query.resolve()?;

        let totals = resources.meal_service.daily_totals(user_id, date).await?;

        Ok((StatusCode::OK, Json(totals)).into_response())
    }
}
