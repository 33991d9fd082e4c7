//! Inference Engine - Record → risk outcome
//!
//! One prediction reads ONE artifact snapshot, then:
//! encode → scale numeric columns → classifier → threshold.
//!
//! A reload that lands mid-call does not affect the call in progress;
//! the next call sees the new snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use super::estimator::Classifier;
use crate::logic::artifacts::ArtifactStore;
use crate::logic::features::{encode, EncodingError};
use crate::models::{EngineStatus, FeatureRecord, PredictionOutcome};

/// Default per-request budget
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Model or scaler not loaded - service not ready")]
    NotReady,

    #[error("Prediction deadline exceeded after {elapsed_ms} ms")]
    DeadlineExceeded { elapsed_ms: u64 },

    #[error("Encoding mismatch: {0}")]
    EncodingMismatch(#[from] EncodingError),

    #[error("Inference failed: {0}")]
    Internal(String),
}

impl PredictionError {
    /// Failures that mean "try again later" rather than "bad input"
    pub fn is_not_ready(&self) -> bool {
        matches!(self, PredictionError::NotReady | PredictionError::DeadlineExceeded { .. })
    }
}

// ============================================================================
// STATS
// ============================================================================

#[derive(Debug, Default)]
struct EngineStats {
    inference_count: AtomicU64,
    failure_count: AtomicU64,
    latency_sum_us: AtomicU64,
}

// ============================================================================
// PREDICTION ENGINE
// ============================================================================

#[derive(Debug, Clone)]
pub struct PredictionEngine {
    store: Arc<ArtifactStore>,
    timeout: Duration,
    stats: Arc<EngineStats>,
}

impl PredictionEngine {
    pub fn new(store: Arc<ArtifactStore>, timeout: Duration) -> Self {
        Self {
            store,
            timeout,
            stats: Arc::new(EngineStats::default()),
        }
    }

    pub fn store(&self) -> &Arc<ArtifactStore> {
        &self.store
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Predict with the configured per-request timeout
    pub fn predict_one(&self, record: &FeatureRecord) -> Result<PredictionOutcome, PredictionError> {
        self.predict_with_deadline(record, Instant::now() + self.timeout)
    }

    pub fn predict_with_deadline(
        &self,
        record: &FeatureRecord,
        deadline: Instant,
    ) -> Result<PredictionOutcome, PredictionError> {
        let started = Instant::now();
        let result = self.run(record, started, deadline);
        let elapsed_us = started.elapsed().as_micros() as u64;

        self.stats.latency_sum_us.fetch_add(elapsed_us, Ordering::Relaxed);
        self.stats.inference_count.fetch_add(1, Ordering::Relaxed);

        match &result {
            Ok(outcome) => {
                tracing::debug!(
                    risk = outcome.risk,
                    probability = outcome.probability,
                    model_version = %outcome.model_version,
                    elapsed_us,
                    "Prediction complete"
                );
            }
            Err(PredictionError::Internal(msg)) => {
                self.stats.failure_count.fetch_add(1, Ordering::Relaxed);
                tracing::error!(?record, "Error in prediction: {}", msg);
            }
            Err(e) => {
                self.stats.failure_count.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(?record, "Prediction rejected: {}", e);
            }
        }

        result
    }

    fn run(
        &self,
        record: &FeatureRecord,
        started: Instant,
        deadline: Instant,
    ) -> Result<PredictionOutcome, PredictionError> {
        // Single snapshot read for the whole call
        let snapshot = self.store.artifacts().ok_or(PredictionError::NotReady)?;
        check_deadline(started, deadline)?;

        let model = &snapshot.model.artifact;
        let scaler = &snapshot.scaler.artifact;

        let mut vector = encode(record, &model.expected_columns)?;
        scaler.transform(&mut vector)?;

        if vector.len() != model.expected_columns.len() {
            return Err(PredictionError::Internal(format!(
                "encoded row has {} values for {} columns",
                vector.len(),
                model.expected_columns.len()
            )));
        }

        let probability = model.estimator.predict_proba(vector.values());
        if !probability.is_finite() {
            return Err(PredictionError::Internal(format!(
                "model {} produced a non-finite probability",
                model.version
            )));
        }
        let probability = probability.clamp(0.0, 1.0);
        // A tie goes to the negative class
        let risk = u8::from(probability > model.decision_threshold);

        check_deadline(started, deadline)?;

        Ok(PredictionOutcome {
            risk,
            probability,
            model_version: model.version.clone(),
        })
    }

    /// Counters since the engine was built, plus current readiness
    pub fn stats(&self) -> EngineStatus {
        let count = self.stats.inference_count.load(Ordering::Relaxed);
        let sum = self.stats.latency_sum_us.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f64 / count as f64) / 1000.0 } else { 0.0 };

        EngineStatus {
            ready: self.store.is_ready(),
            model_version: self.store.current_version(),
            inference_count: count,
            failure_count: self.stats.failure_count.load(Ordering::Relaxed),
            avg_latency_ms: avg,
        }
    }
}

fn check_deadline(started: Instant, deadline: Instant) -> Result<(), PredictionError> {
    if Instant::now() >= deadline {
        return Err(PredictionError::DeadlineExceeded {
            elapsed_ms: started.elapsed().as_millis() as u64,
        });
    }
    Ok(())
}
