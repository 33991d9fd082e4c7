//! Shared fixtures for unit tests

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use super::artifacts::{ArtifactPaths, ArtifactStore, RecoveryPolicy};
use super::features::layout::TRAINED_COLUMNS;
use crate::models::{FeatureRecord, Gender, SmokingHistory};

pub const MODEL_FILE: &str = "model.json";
pub const SCALER_FILE: &str = "scaler.json";

pub fn model_json(version: &str) -> Value {
    json!({
        "version": version,
        "algorithm": "LogisticRegression",
        "trained_at": "2025-05-28T18:02:00Z",
        "expected_columns": TRAINED_COLUMNS,
        "metrics": {
            "accuracy": 0.956,
            "precision": 0.923,
            "recall": 0.889,
            "f1_score": 0.906,
            "roc_auc": 0.982,
            "confusion_matrix": [[85432, 3421], [2156, 8073]]
        },
        "estimator": {
            "type": "logistic",
            "intercept": -4.0,
            "coefficients": [0.8, 0.6, 0.5, 0.4, 2.0, 1.5, 0.3, 0.0, 0.2, 0.2, 0.1, 0.0, 0.1]
        }
    })
}

pub fn scaler_json() -> Value {
    json!({
        "columns": ["age", "bmi", "HbA1c_level", "blood_glucose_level"],
        "mean": [41.9, 27.3, 5.5, 138.0],
        "scale": [22.5, 6.6, 1.1, 40.7]
    })
}

pub fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

pub fn write_artifacts(dir: &Path, version: &str) {
    write_json(&dir.join(MODEL_FILE), &model_json(version));
    write_json(&dir.join(SCALER_FILE), &scaler_json());
}

pub fn paths(dir: &Path) -> ArtifactPaths {
    ArtifactPaths::under(dir, Path::new(MODEL_FILE), Path::new(SCALER_FILE))
}

pub fn store(dir: &Path, policy: RecoveryPolicy) -> Arc<ArtifactStore> {
    Arc::new(ArtifactStore::new(paths(dir), policy))
}

/// Store with valid artifacts, already loaded
pub fn ready_store(dir: &Path, version: &str) -> Arc<ArtifactStore> {
    write_artifacts(dir, version);
    let store = store(dir, RecoveryPolicy::Manual);
    assert!(store.ensure_loaded());
    store
}

pub fn patient() -> FeatureRecord {
    FeatureRecord {
        gender: Gender::Female,
        age: 45.0,
        hypertension: 0,
        heart_disease: 0,
        smoking_history: SmokingHistory::Never,
        bmi: 28.5,
        hba1c_level: 6.2,
        blood_glucose_level: 140.0,
    }
}
