//! Health and readiness handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use super::probe;
use crate::models::ReadinessStatus;
use crate::{AppResult, AppState};

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
}

pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// Readiness probe; 503 until both artifacts are loaded
pub async fn ready(State(state): State<AppState>) -> AppResult<(StatusCode, Json<ReadinessStatus>)> {
    probe(&state).await?;
    let status = state.store.readiness_status();

    let code = if status.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    Ok((code, Json(status)))
}
