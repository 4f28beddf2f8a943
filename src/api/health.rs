// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Health and readiness probes.

use axum::{extract::State, http::StatusCode, response::Response, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::response::{self, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

/// Service health: verifies the wallet database answers queries.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "A dependency is unavailable")
    )
)]
pub async fn health(State(state): State<AppState>) -> Response {
    match state.wallets.count() {
        Ok(_) => response::ok(HealthResponse {
            status: "healthy".to_string(),
            database: "healthy".to_string(),
        }),
        Err(_) => response::with_status(
            StatusCode::SERVICE_UNAVAILABLE,
            HealthResponse {
                status: "unhealthy".to_string(),
                database: "unhealthy".to_string(),
            },
        ),
    }
}

/// Liveness probe; answers as long as the process is serving requests.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(serde_json::json!({"status": "alive"})))
}

/// Readiness probe; fails while dependencies are unavailable.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Ready to serve traffic"),
        (status = 503, description = "Not ready")
    )
)]
pub async fn readiness(State(state): State<AppState>) -> Response {
    match state.wallets.count() {
        Ok(_) => response::ok(serde_json::json!({"status": "ready"})),
        Err(_) => response::with_status(
            StatusCode::SERVICE_UNAVAILABLE,
            serde_json::json!({"status": "not ready"}),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn health_reports_healthy_database() {
        let (state, _guard) = test_state();
        let response = health(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["database"], "healthy");
    }

    #[tokio::test]
    async fn liveness_always_succeeds() {
        let Json(body) = liveness().await;
        assert!(body.success);
    }
}
