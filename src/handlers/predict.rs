//! Prediction handlers

use axum::{extract::State, Json};
use validator::Validate;

use super::{check_batch_size, probe, validate_records};
use crate::logic::model::PredictionError;
use crate::models::{BatchPredictionRequest, BatchPredictionResponse, FeatureRecord, PredictionOutcome};
use crate::{AppError, AppResult, AppState};

async fn ensure_ready(state: &AppState) -> AppResult<()> {
    if !probe(state).await? {
        return Err(PredictionError::NotReady.into());
    }
    Ok(())
}

/// Predict diabetes risk for a single patient
pub async fn predict(
    State(state): State<AppState>,
    Json(record): Json<FeatureRecord>,
) -> AppResult<Json<PredictionOutcome>> {
    record.validate()?;
    ensure_ready(&state).await?;

    let outcome = state.engine.predict_one(&record)?;
    Ok(Json(outcome))
}

/// Predict diabetes risk for multiple patients
pub async fn batch_predict(
    State(state): State<AppState>,
    Json(req): Json<BatchPredictionRequest>,
) -> AppResult<Json<BatchPredictionResponse>> {
    check_batch_size(req.data.len(), state.config.max_batch_size)?;
    validate_records(&req.data)?;
    ensure_ready(&state).await?;

    let orchestrator = state.batch.clone();
    let result = tokio::task::spawn_blocking(move || orchestrator.predict_many(&req.data))
        .await
        .map_err(|e| AppError::InternalError(format!("Batch worker failed: {}", e)))?;

    Ok(Json(result.into_response()))
}
