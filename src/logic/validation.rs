//! Validation Advisor - Clinical plausibility checks
//!
//! Independent of the model. Range limits are enforced when the record is
//! built; these rules only flag unusual but possible values. Every finding
//! is a warning, so `valid` stays true.

use crate::models::{FeatureRecord, ValidationResult};

// ============================================================================
// THRESHOLDS
// ============================================================================

const MIN_ADULT_AGE: f64 = 18.0;
const MAX_PLAUSIBLE_AGE: f64 = 100.0;
const LOW_BMI: f64 = 15.0;
const HIGH_BMI: f64 = 50.0;
const LOW_GLUCOSE: f64 = 70.0;
const HIGH_GLUCOSE: f64 = 300.0;
const HIGH_HBA1C: f64 = 10.0;
const HEART_DISEASE_AGE: f64 = 30.0;
const HYPERTENSION_AGE: f64 = 25.0;

/// Check one record
pub fn evaluate(record: &FeatureRecord) -> ValidationResult {
    let errors: Vec<String> = Vec::new();
    let mut warnings = Vec::new();

    if record.age < MIN_ADULT_AGE {
        warnings.push("Patient is under 18 years old".to_string());
    } else if record.age > MAX_PLAUSIBLE_AGE {
        warnings.push("Patient is over 100 years old - verify data accuracy".to_string());
    }

    if record.bmi < LOW_BMI {
        warnings.push("BMI is very low (< 15) - check measurement accuracy".to_string());
    } else if record.bmi > HIGH_BMI {
        warnings.push("BMI is very high (> 50) - verify measurement".to_string());
    }

    if record.blood_glucose_level < LOW_GLUCOSE {
        warnings.push("Blood glucose level is low - patient might be hypoglycemic".to_string());
    } else if record.blood_glucose_level > HIGH_GLUCOSE {
        warnings.push(
            "Blood glucose level is very high - immediate medical attention may be needed".to_string(),
        );
    }

    if record.hba1c_level > HIGH_HBA1C {
        warnings.push("HbA1c level is very high - indicates poor glucose control".to_string());
    }

    // Logical consistency
    if record.age < HEART_DISEASE_AGE && record.heart_disease == 1 {
        warnings.push("Heart disease in patient under 30 is uncommon - verify data".to_string());
    }

    if record.age < HYPERTENSION_AGE && record.hypertension == 1 {
        warnings.push("Hypertension in patient under 25 is uncommon - verify data".to_string());
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Check each record independently, preserving order
pub fn evaluate_batch(records: &[FeatureRecord]) -> Vec<ValidationResult> {
    records.iter().map(evaluate).collect()
}
