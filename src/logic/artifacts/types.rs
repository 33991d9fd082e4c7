//! Persisted artifact formats
//!
//! Both artifacts are JSON documents written by the training pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::collections::HashSet;

use crate::logic::features::encoder::{duplicate_column, EncodedVector, EncodingError};
use crate::logic::features::NUMERIC_COLUMNS;
use crate::logic::model::estimator::{Classifier, Estimator};
use crate::models::ModelMetrics;

fn default_threshold() -> f64 {
    0.5
}

/// Trained classifier plus the schema it was fit on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: String,
    pub algorithm: String,
    pub trained_at: DateTime<Utc>,
    /// Column order the model was fit on
    pub expected_columns: Vec<String>,
    pub metrics: ModelMetrics,
    /// Probability above which risk = 1
    #[serde(default = "default_threshold")]
    pub decision_threshold: f64,
    pub estimator: Estimator,
}

impl ModelArtifact {
    /// Structural checks run once at load time
    pub fn check(&self) -> Result<(), String> {
        if self.version.trim().is_empty() {
            return Err("model version is empty".to_string());
        }
        if self.expected_columns.is_empty() {
            return Err("model declares no expected columns".to_string());
        }
        if let Some(c) = duplicate_column(&self.expected_columns) {
            return Err(format!("column '{}' listed more than once", c));
        }
        if !(0.0..=1.0).contains(&self.decision_threshold) {
            return Err(format!(
                "decision threshold {} outside [0, 1]",
                self.decision_threshold
            ));
        }
        self.estimator.check_shape(self.expected_columns.len())
    }
}

/// StandardScaler parameters for the numeric columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub columns: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl ScalerArtifact {
    pub fn check(&self) -> Result<(), String> {
        if self.columns.is_empty() {
            return Err("scaler declares no columns".to_string());
        }
        if self.mean.len() != self.columns.len() || self.scale.len() != self.columns.len() {
            return Err(format!(
                "scaler has {} columns but {} means and {} scales",
                self.columns.len(),
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err("scaler contains non-finite parameters".to_string());
        }

        // Only the numeric columns are standardized, each exactly once
        let mut seen = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            if !NUMERIC_COLUMNS.contains(&column.as_str()) {
                return Err(format!("scaler column '{}' is not a numeric feature", column));
            }
            if !seen.insert(column.as_str()) {
                return Err(format!("scaler column '{}' listed more than once", column));
            }
        }
        Ok(())
    }

    /// Standardize the scaler's columns in place; other columns pass through.
    /// A zero scale leaves the centered value unscaled.
    pub fn transform(&self, vector: &mut EncodedVector<'_>) -> Result<(), EncodingError> {
        for (i, column) in self.columns.iter().enumerate() {
            let position = vector
                .position(column)
                .ok_or_else(|| EncodingError::UnknownScalerColumn(column.clone()))?;

            let scale = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            let value = &mut vector.values_mut()[position];
            *value = (*value - self.mean[i]) / scale;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::encode;
    use crate::logic::features::layout::trained_columns;
    use crate::models::{FeatureRecord, Gender, SmokingHistory};

    fn record() -> FeatureRecord {
        FeatureRecord {
            gender: Gender::Male,
            age: 50.0,
            hypertension: 1,
            heart_disease: 0,
            smoking_history: SmokingHistory::Current,
            bmi: 30.0,
            hba1c_level: 6.0,
            blood_glucose_level: 150.0,
        }
    }

    fn scaler() -> ScalerArtifact {
        ScalerArtifact {
            columns: vec![
                "age".to_string(),
                "bmi".to_string(),
                "HbA1c_level".to_string(),
                "blood_glucose_level".to_string(),
            ],
            mean: vec![40.0, 27.0, 5.5, 140.0],
            scale: vec![20.0, 6.0, 0.0, 40.0],
        }
    }

    #[test]
    fn test_transform_only_numeric_columns() {
        let columns = trained_columns();
        let mut vector = encode(&record(), &columns).unwrap();
        scaler().transform(&mut vector).unwrap();

        assert_eq!(vector.get("age"), Some(0.5));
        assert_eq!(vector.get("bmi"), Some(0.5));
        assert_eq!(vector.get("HbA1c_level"), Some(0.5)); // zero scale
        assert_eq!(vector.get("blood_glucose_level"), Some(0.25));
        // Passed through unscaled
        assert_eq!(vector.get("hypertension"), Some(1.0));
        assert_eq!(vector.get("smoking_history_current"), Some(1.0));
    }

    #[test]
    fn test_transform_unknown_column() {
        let columns = vec!["age".to_string()];
        let mut vector = encode(&record(), &columns).unwrap();
        let err = scaler().transform(&mut vector).unwrap_err();
        assert_eq!(err, EncodingError::UnknownScalerColumn("bmi".to_string()));
    }

    #[test]
    fn test_scaler_check_rejects_duplicate_column() {
        let mut bad = scaler();
        bad.columns[1] = "age".to_string();

        let err = bad.check().unwrap_err();
        assert!(err.contains("'age' listed more than once"));
    }

    #[test]
    fn test_scaler_check_rejects_non_numeric_columns() {
        for column in ["hypertension", "smoking_history_never", "gender_Male"] {
            let mut bad = scaler();
            bad.columns[3] = column.to_string();

            let err = bad.check().unwrap_err();
            assert!(err.contains("not a numeric feature"), "{}: {}", column, err);
        }
    }

    #[test]
    fn test_scaler_check_lengths() {
        let mut bad = scaler();
        bad.scale.pop();
        assert!(bad.check().is_err());
        assert!(scaler().check().is_ok());
    }
}
