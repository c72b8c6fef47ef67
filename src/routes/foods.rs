// ABOUTME: Food lookup routes proxying USDA FoodData Central
// ABOUTME: Free-text search and per-food macro lookup; the API key never leaves the server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::usda;
use crate::external::FoodSearchResult;
use crate::resources::ServerResources;
use axum::{
    extract::{rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use macro_tracker_core::errors::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query parameters for food search
#[derive(Debug, Deserialize)]
pub struct FoodSearchQuery {
    /// Free-text query
    pub query: Option<String>,
    /// Number of results (1-200, default 25)
    pub page_size: Option<u32>,
}

/// Food search response
#[derive(Debug, Serialize, Deserialize)]
pub struct FoodSearchResponse {
    /// Query as received
    pub query: String,
    /// Matching foods
    pub foods: Vec<FoodSearchResult>,
    /// Number of foods returned
    pub total: usize,
}

/// Food routes handler
pub struct FoodRoutes;

impl FoodRoutes {
    /// Create all food lookup routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/foods/search", get(Self::handle_search))
            .route("/api/foods/:fdc_id", get(Self::handle_get_food))
            .with_state(resources)
    }

    /// Handle GET /api/foods/search - Search foods by text
    async fn handle_search(
        State(resources): State<Arc<ServerResources>>,
        query: Result<Query<FoodSearchQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let Query(params) = query.map_err(|e| AppError::invalid_input(e.body_text()))?;
        let search = params
            .query
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| AppError::missing_field("query"))?;
        let page_size = params.page_size.unwrap_or(usda::DEFAULT_PAGE_SIZE);

        let source = resources.require_food_source()?;
        let foods = source.search_foods(&search, page_size).await?;

        let response = FoodSearchResponse {
            query: search,
            total: foods.len(),
            foods,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/foods/:fdc_id - Macros per 100 g for one food
    async fn handle_get_food(
        State(resources): State<Arc<ServerResources>>,
        fdc_id: Result<Path<u64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let Path(fdc_id) = fdc_id.map_err(|e| AppError::invalid_input(e.body_text()))?;

        let source = resources.require_food_source()?;
        let food = source.get_food_macros(fdc_id).await?;

        Ok((StatusCode::OK, Json(food)).into_response())
    }
}
