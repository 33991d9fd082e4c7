//! Prediction request/response models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::patient::FeatureRecord;

/// Model version reported when no model is loaded
pub const UNAVAILABLE_VERSION: &str = "unavailable";

/// Risk outcome for a single patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    /// 0 (low risk) or 1 (high risk)
    pub risk: u8,
    /// Probability of the positive class (0.0 - 1.0)
    pub probability: f64,
    /// Version of the model that produced this outcome
    pub model_version: String,
}

impl PredictionOutcome {
    /// Placeholder outcome substituted for a failed batch item
    pub fn fallback(model_version: impl Into<String>) -> Self {
        Self {
            risk: 0,
            probability: 0.0,
            model_version: model_version.into(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BatchPredictionRequest {
    pub data: Vec<FeatureRecord>,
}

/// Failure detail for one batch position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItemError {
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchPredictionResponse {
    pub results: Vec<PredictionOutcome>,
    pub processed_count: usize,
    pub failed_count: usize,
    pub elapsed_seconds: f64,
    pub batch_id: Uuid,
    pub errors: Vec<BatchItemError>,
}
