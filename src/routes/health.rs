// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Provides the banner, liveness and database-backed readiness endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring
//!
//! This module provides health and readiness endpoints
//! for monitoring and load balancer health checks.

use crate::resources::ServerResources;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tracing::warn;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::handle_banner))
            .route("/health", get(Self::handle_health))
            .route("/ready", get(Self::handle_ready))
            .with_state(resources)
    }

    async fn handle_banner() -> &'static str {
        "Macro tracker API is running"
    }

    async fn handle_health() -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "status": "healthy",
            "service": crate::constants::service_names::MACRO_TRACKER_SERVER,
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    /// Ready once the database answers; reports whether food lookup is configured
    async fn handle_ready(State(resources): State<Arc<ServerResources>>) -> Response {
        let database_ok = match sqlx::query("SELECT 1")
            .execute(resources.database.pool())
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!("Readiness check failed: {}", e);
                false
            }
        };

        let status = if database_ok {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        (
            status,
            Json(serde_json::json!({
                "status": if database_ok { "ready" } else { "not_ready" },
                "database": database_ok,
                "food_api": resources.food_source.is_some(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
        )
            .into_response()
    }
}
