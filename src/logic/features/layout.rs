//! Feature Layout - Column naming for the diabetes model
//!
//! **The model artifact is the authority on column order.**
//!
//! This file only defines how raw record fields are NAMED once expanded,
//! so the encoder output can be reindexed against `expected_columns`.
//!
//! ## Naming rules (must match the training pipeline):
//! 1. Numeric and binary fields keep their raw name
//! 2. Categorical fields expand to `<field>_<category>` indicators
//! 3. Category labels are used verbatim (including spaces)

use crc32fast::Hasher;

use crate::models::{FeatureInfo, FeatureKind, Gender, SmokingHistory};

// ============================================================================
// COLUMN NAMES
// ============================================================================

pub const AGE: &str = "age";
pub const HYPERTENSION: &str = "hypertension";
pub const HEART_DISEASE: &str = "heart_disease";
pub const BMI: &str = "bmi";
pub const HBA1C_LEVEL: &str = "HbA1c_level";
pub const BLOOD_GLUCOSE_LEVEL: &str = "blood_glucose_level";

/// Categorical field names (never valid as model columns after expansion)
pub const GENDER: &str = "gender";
pub const SMOKING_HISTORY: &str = "smoking_history";

/// Columns the scaler was fit on
pub const NUMERIC_COLUMNS: [&str; 4] = [AGE, BMI, HBA1C_LEVEL, BLOOD_GLUCOSE_LEVEL];

/// Column order produced by the training pipeline (`get_dummies`,
/// `drop_first=True`). The dataset also contained gender "Other", so the
/// model expects a `gender_Other` indicator the encoder never sets.
pub const TRAINED_COLUMNS: &[&str] = &[
    AGE,                               // 0
    HYPERTENSION,                      // 1
    HEART_DISEASE,                     // 2
    BMI,                               // 3
    HBA1C_LEVEL,                       // 4
    BLOOD_GLUCOSE_LEVEL,               // 5
    "gender_Male",                     // 6
    "gender_Other",                    // 7
    "smoking_history_current",         // 8
    "smoking_history_ever",            // 9
    "smoking_history_former",          // 10
    "smoking_history_never",           // 11
    "smoking_history_not current",     // 12
];

/// Indicator column name for a categorical value
pub fn indicator_column(field: &str, category: &str) -> String {
    format!("{}_{}", field, category)
}

/// Every column the encoder can produce, in canonical order
pub fn produced_columns() -> Vec<String> {
    let mut columns: Vec<String> = [AGE, HYPERTENSION, HEART_DISEASE, BMI, HBA1C_LEVEL, BLOOD_GLUCOSE_LEVEL]
        .iter()
        .map(|c| c.to_string())
        .collect();
    columns.extend(Gender::ALL.iter().map(|g| indicator_column(GENDER, g.as_str())));
    columns.extend(SmokingHistory::ALL.iter().map(|s| indicator_column(SMOKING_HISTORY, s.as_str())));
    columns
}

/// Owned copy of the trained column order
pub fn trained_columns() -> Vec<String> {
    TRAINED_COLUMNS.iter().map(|c| c.to_string()).collect()
}

// ============================================================================
// SCHEMA HASH
// ============================================================================

/// CRC32 over the ordered column names.
/// Two models with the same hash share the same input shape.
pub fn schema_hash<S: AsRef<str>>(columns: &[S]) -> u32 {
    let mut hasher = Hasher::new();

    for name in columns {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// FEATURE CATALOG
// ============================================================================

fn numeric(name: &str, min: f64, max: f64) -> FeatureInfo {
    FeatureInfo {
        name: name.to_string(),
        kind: FeatureKind::Numeric,
        required: true,
        min_value: Some(min),
        max_value: Some(max),
        allowed_values: None,
    }
}

fn binary(name: &str) -> FeatureInfo {
    FeatureInfo {
        kind: FeatureKind::Binary,
        ..numeric(name, 0.0, 1.0)
    }
}

fn categorical(name: &str, allowed: Vec<String>) -> FeatureInfo {
    FeatureInfo {
        name: name.to_string(),
        kind: FeatureKind::Categorical,
        required: true,
        min_value: None,
        max_value: None,
        allowed_values: Some(allowed),
    }
}

/// Raw input fields accepted by the API, with their constraints
pub fn feature_catalog() -> Vec<FeatureInfo> {
    vec![
        categorical(GENDER, Gender::ALL.iter().map(|g| g.as_str().to_string()).collect()),
        numeric(AGE, 0.0, 120.0),
        binary(HYPERTENSION),
        binary(HEART_DISEASE),
        categorical(SMOKING_HISTORY, SmokingHistory::ALL.iter().map(|s| s.as_str().to_string()).collect()),
        numeric(BMI, 10.0, 80.0),
        numeric(HBA1C_LEVEL, 3.5, 15.0),
        numeric(BLOOD_GLUCOSE_LEVEL, 50.0, 400.0),
    ]
}

// ============================================================================
// TESTS
// ============================================================================
