//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use core_kernel::AdapterHealth;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub rating_config_version: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub customer_history: AdapterHealth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        rating_config_version: state.service.config().version.clone(),
    })
}

/// Readiness check (includes the customer history source)
///
/// A degraded history source still serves quotes, without history discounts.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let health = state.service.history_health().await;

    let status = match health.status {
        AdapterHealth::Healthy | AdapterHealth::Degraded => StatusCode::OK,
        AdapterHealth::Unhealthy | AdapterHealth::Unknown => StatusCode::SERVICE_UNAVAILABLE,
    };

    (
        status,
        Json(ReadinessResponse {
            status: if status.is_success() { "ready" } else { "not_ready" }.to_string(),
            customer_history: health.status,
            message: health.message,
        }),
    )
}
