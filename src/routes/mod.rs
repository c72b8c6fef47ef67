// ABOUTME: Route module organization for the macro tracker HTTP endpoints
// ABOUTME: Assembles domain routers and wraps them in CORS, tracing and request-id layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the service layer.

/// Food search and lookup routes
pub mod foods;
/// Health check and system status routes
pub mod health;
/// Caller identity resolution
pub mod identity;
/// Meal log routes
pub mod meals;
/// Profile routes
pub mod profile;

pub use foods::FoodRoutes;
pub use health::HealthRoutes;
pub use meals::MealRoutes;
pub use profile::ProfileRoutes;

use crate::middleware::{create_request_span, record_response, setup_cors};
use crate::resources::ServerResources;
use axum::{body::Body, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// Build the complete application router
///
/// Layer order, outermost first: CORS, request-id assignment, tracing,
/// request-id propagation onto the response.
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(FoodRoutes::routes(Arc::clone(&resources)))
        .merge(MealRoutes::routes(Arc::clone(&resources)))
        .merge(ProfileRoutes::routes(resources))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(create_request_span::<Body>)
                        .on_response(record_response::<Body>),
                )
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(cors)
}
