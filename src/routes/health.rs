// ABOUTME: Health check route handler for service monitoring
// ABOUTME: Reports healthy when the history store answers; provider reachability is informational
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check route for load balancers and process supervisors

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::warn;

use crate::{constants::endpoints, errors::AppError, resources::ServerResources};

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(endpoints::HEALTH, get(Self::health_handler))
            .with_state(resources)
    }

    async fn health_handler(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Json<Value>, AppError> {
        resources.database.health_check().await?;

        // Provider reachability is reported but never fails the check
        let provider = resources.orchestrator.provider();
        let llm_status = match provider.health_check().await {
            Ok(true) => "ok",
            Ok(false) => "unreachable",
            Err(e) => {
                warn!("{} health check failed: {}", provider.name(), e);
                "unreachable"
            }
        };

        Ok(Json(json!({
            "status": "healthy",
            "database": "ok",
            "llm": {
                "provider": provider.name(),
                "model": provider.default_model(),
                "status": llm_status,
            },
            "version": env!("CARGO_PKG_VERSION"),
        })))
    }
}
