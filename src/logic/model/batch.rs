//! Batch Orchestrator - Many records, one call
//!
//! Items run in input order. A failing item never aborts the batch: its
//! error is kept for inspection and the response carries a fallback
//! outcome at that position, stamped with the model version current when
//! the item failed.

use std::time::Instant;

use uuid::Uuid;

use super::inference::{PredictionEngine, PredictionError};
use crate::models::{
    BatchItemError, BatchPredictionResponse, FeatureRecord, PredictionOutcome, UNAVAILABLE_VERSION,
};

/// One failed batch position
#[derive(Debug, Clone)]
pub struct FailedItem {
    pub error: PredictionError,
    /// Substituted at this position in `results()`
    pub fallback: PredictionOutcome,
}

/// Per-item results of one batch call
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub batch_id: Uuid,
    pub outcomes: Vec<Result<PredictionOutcome, FailedItem>>,
    pub processed_count: usize,
    pub failed_count: usize,
    pub elapsed_seconds: f64,
}

impl BatchResult {
    /// Outcomes aligned 1:1 with the input, fallbacks in failed slots
    pub fn results(&self) -> Vec<PredictionOutcome> {
        self.outcomes
            .iter()
            .map(|r| match r {
                Ok(outcome) => outcome.clone(),
                Err(failed) => failed.fallback.clone(),
            })
            .collect()
    }

    /// Failed positions with their cause
    pub fn failures(&self) -> Vec<(usize, &PredictionError)> {
        self.outcomes
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().err().map(|f| (i, &f.error)))
            .collect()
    }

    pub fn into_response(self) -> BatchPredictionResponse {
        let results = self.results();
        let errors = self
            .failures()
            .into_iter()
            .map(|(index, e)| BatchItemError {
                index,
                error: e.to_string(),
            })
            .collect();

        BatchPredictionResponse {
            results,
            processed_count: self.processed_count,
            failed_count: self.failed_count,
            elapsed_seconds: self.elapsed_seconds,
            batch_id: self.batch_id,
            errors,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    engine: PredictionEngine,
}

impl BatchOrchestrator {
    pub fn new(engine: PredictionEngine) -> Self {
        Self { engine }
    }

    /// Run every record through the engine. No size cap here; the caller
    /// enforces one if needed.
    pub fn predict_many(&self, records: &[FeatureRecord]) -> BatchResult {
        let batch_id = Uuid::new_v4();
        let started = Instant::now();

        let outcomes: Vec<_> = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let deadline = Instant::now() + self.engine.timeout();
                self.engine
                    .predict_with_deadline(record, deadline)
                    .map_err(|error| {
                        tracing::error!(%batch_id, index, "Failed to predict for patient: {}", error);
                        self.failed_item(error)
                    })
            })
            .collect();

        let failed_count = outcomes.iter().filter(|r| r.is_err()).count();

        let result = BatchResult {
            batch_id,
            processed_count: records.len(),
            failed_count,
            elapsed_seconds: started.elapsed().as_secs_f64(),
            outcomes,
        };

        tracing::info!(
            %batch_id,
            processed = result.processed_count,
            failed = result.failed_count,
            elapsed_seconds = result.elapsed_seconds,
            "Batch prediction complete"
        );

        result
    }

    fn failed_item(&self, error: PredictionError) -> FailedItem {
        let version = self
            .engine
            .store()
            .current_version()
            .unwrap_or_else(|| UNAVAILABLE_VERSION.to_string());

        FailedItem {
            error,
            fallback: PredictionOutcome::fallback(version),
        }
    }
}
