//! Service info and health endpoints.

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use crate::AppState;
use crate::models::{HealthResponse, ServiceInfo};

/// `GET /` — service banner.
pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Acervo API".into(),
        status: "online".into(),
        version: acervo_core::version().into(),
        environment: state.config.environment.clone(),
    })
}

/// `GET /api/health` — liveness check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".into(),
        timestamp: Utc::now().to_rfc3339(),
        environment: state.config.environment.clone(),
    })
}
