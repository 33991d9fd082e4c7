//! Data validation handlers (no prediction)

use axum::{extract::State, Json};
use validator::Validate;

use super::{check_batch_size, validate_records};
use crate::logic::validation;
use crate::models::{FeatureRecord, ValidationResult};
use crate::{AppResult, AppState};

/// Validate one patient record
pub async fn validate(Json(record): Json<FeatureRecord>) -> AppResult<Json<ValidationResult>> {
    record.validate()?;
    Ok(Json(validation::evaluate(&record)))
}

/// Validate multiple patient records
pub async fn validate_batch(
    State(state): State<AppState>,
    Json(records): Json<Vec<FeatureRecord>>,
) -> AppResult<Json<Vec<ValidationResult>>> {
    check_batch_size(records.len(), state.config.max_batch_size)?;
    validate_records(&records)?;
    Ok(Json(validation::evaluate_batch(&records)))
}
