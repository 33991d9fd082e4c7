//! Feature Encoder - Record → model-aligned numeric row
//!
//! Categorical fields are one-hot expanded, then the row is reindexed
//! against the model's `expected_columns`:
//! - expected but not produced → 0.0
//! - produced but not expected → dropped
//!
//! The encoder is stateless; the only schema it knows is the one passed in.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::layout::{
    indicator_column, AGE, BLOOD_GLUCOSE_LEVEL, BMI, GENDER, HBA1C_LEVEL, HEART_DISEASE,
    HYPERTENSION, SMOKING_HISTORY,
};
use crate::models::{FeatureRecord, Gender, SmokingHistory};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    #[error("model schema expects raw categorical column '{0}' (ordinal encoding is not supported)")]
    OrdinalColumn(String),

    #[error("model schema lists column '{0}' more than once")]
    DuplicateColumn(String),

    #[error("field '{field}' is not a finite number ({value})")]
    NonFinite { field: &'static str, value: f64 },

    #[error("scaler column '{0}' is not part of the model schema")]
    UnknownScalerColumn(String),
}

/// Numeric row aligned 1:1 with a model's trained columns
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedVector<'a> {
    columns: &'a [String],
    values: Vec<f64>,
}

impl<'a> EncodedVector<'a> {
    pub fn columns(&self) -> &'a [String] {
        self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Value of a named column, if the schema has it
    pub fn get(&self, column: &str) -> Option<f64> {
        self.position(column).map(|i| self.values[i])
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Expand a record into every column the encoder knows about
fn expand(record: &FeatureRecord) -> Result<HashMap<String, f64>, EncodingError> {
    let numeric = [
        (AGE, record.age),
        (BMI, record.bmi),
        (HBA1C_LEVEL, record.hba1c_level),
        (BLOOD_GLUCOSE_LEVEL, record.blood_glucose_level),
    ];

    let mut row = HashMap::with_capacity(16);

    for (field, value) in numeric {
        if !value.is_finite() {
            return Err(EncodingError::NonFinite { field, value });
        }
        row.insert(field.to_string(), value);
    }

    row.insert(HYPERTENSION.to_string(), f64::from(record.hypertension));
    row.insert(HEART_DISEASE.to_string(), f64::from(record.heart_disease));

    for gender in Gender::ALL {
        let hot = if gender == record.gender { 1.0 } else { 0.0 };
        row.insert(indicator_column(GENDER, gender.as_str()), hot);
    }

    for smoking in SmokingHistory::ALL {
        let hot = if smoking == record.smoking_history { 1.0 } else { 0.0 };
        row.insert(indicator_column(SMOKING_HISTORY, smoking.as_str()), hot);
    }

    Ok(row)
}

/// First column listed more than once, if any
pub fn duplicate_column(columns: &[String]) -> Option<&String> {
    let mut seen = HashSet::with_capacity(columns.len());
    for column in columns {
        if !seen.insert(column.as_str()) {
            return Some(column);
        }
    }
    None
}

/// Check that a column schema can be served by one-hot encoding.
/// Duplicates are reported ahead of ordinal columns.
pub fn check_schema(expected_columns: &[String]) -> Result<(), EncodingError> {
    if let Some(column) = duplicate_column(expected_columns) {
        return Err(EncodingError::DuplicateColumn(column.clone()));
    }

    match expected_columns
        .iter()
        .find(|c| c.as_str() == GENDER || c.as_str() == SMOKING_HISTORY)
    {
        Some(column) => Err(EncodingError::OrdinalColumn(column.clone())),
        None => Ok(()),
    }
}

/// Encode a record against the model's trained column order
pub fn encode<'a>(
    record: &FeatureRecord,
    expected_columns: &'a [String],
) -> Result<EncodedVector<'a>, EncodingError> {
    check_schema(expected_columns)?;

    let row = expand(record)?;

    let values = expected_columns
        .iter()
        .map(|column| row.get(column).copied().unwrap_or(0.0))
        .collect();

    Ok(EncodedVector {
        columns: expected_columns,
        values,
    })
}
