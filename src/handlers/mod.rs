//! HTTP handlers

pub mod health;
pub mod predict;
pub mod model;
pub mod validate;

use validator::Validate;

use crate::logic::artifacts::RecoveryPolicy;
use crate::models::FeatureRecord;
use crate::{AppError, AppResult, AppState};

/// Readiness probe. A retrying probe may read artifact files, so it runs
/// on the blocking pool.
async fn probe(state: &AppState) -> AppResult<bool> {
    let store = state.store.clone();
    match store.policy() {
        RecoveryPolicy::Manual => Ok(store.is_ready()),
        RecoveryPolicy::RetryOnProbe => tokio::task::spawn_blocking(move || store.probe())
            .await
            .map_err(|e| AppError::InternalError(format!("Readiness probe failed: {}", e))),
    }
}

/// Reject empty or oversized batches
fn check_batch_size(len: usize, max: usize) -> AppResult<()> {
    if len == 0 {
        return Err(AppError::ValidationError("Empty data list provided".to_string()));
    }
    if len > max {
        return Err(AppError::ValidationError(format!(
            "Batch size too large - maximum {} patients per request",
            max
        )));
    }
    Ok(())
}

/// Range-check every record, reporting the first offending position
fn validate_records(records: &[FeatureRecord]) -> AppResult<()> {
    for (index, record) in records.iter().enumerate() {
        record
            .validate()
            .map_err(|e| AppError::ValidationError(format!("record {}: {}", index, e)))?;
    }
    Ok(())
}
