//! Model metadata and management handlers

use axum::{extract::State, Json};

use super::probe;
use crate::logic::features::feature_catalog;
use crate::models::{EngineStatus, FeaturesResponse, ModelInfo, ModelMetrics, ReloadResponse};
use crate::{AppError, AppResult, AppState};

fn model_not_loaded() -> AppError {
    AppError::ServiceUnavailable("Model not loaded".to_string())
}

/// Model algorithm, training date, version and schema
pub async fn info(State(state): State<AppState>) -> AppResult<Json<ModelInfo>> {
    probe(&state).await?;
    state.store.model_info().map(Json).ok_or_else(model_not_loaded)
}

/// Evaluation metrics recorded at training time
pub async fn metrics(State(state): State<AppState>) -> AppResult<Json<ModelMetrics>> {
    probe(&state).await?;
    state.store.metrics().map(Json).ok_or_else(model_not_loaded)
}

/// Input features with types, constraints and allowed values
pub async fn feature_names() -> Json<FeaturesResponse> {
    Json(FeaturesResponse {
        features: feature_catalog(),
    })
}

pub async fn engine_status(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.engine.stats())
}

/// Force reload of model and scaler from disk (admin)
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let store = state.store.clone();
    let success = tokio::task::spawn_blocking(move || store.reload())
        .await
        .map_err(|e| AppError::InternalError(format!("Reload worker failed: {}", e)))?;

    let response = if success {
        ReloadResponse {
            success: true,
            message: "Model and scaler reloaded successfully".to_string(),
            model_version: state.store.current_version(),
        }
    } else {
        ReloadResponse {
            success: false,
            message: "Failed to reload model or scaler".to_string(),
            model_version: None,
        }
    };

    tracing::info!("Reload requested: success={}", success);
    Ok(Json(response))
}
