//! Patient feature record

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Patient gender as recorded at intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Category label as it appears in the training data
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Smoking history category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SmokingHistory {
    #[serde(rename = "never")]
    Never,
    #[serde(rename = "No Info")]
    NoInfo,
    #[serde(rename = "current")]
    Current,
    #[serde(rename = "former")]
    Former,
    #[serde(rename = "ever")]
    Ever,
    #[serde(rename = "not current")]
    NotCurrent,
}

impl SmokingHistory {
    pub const ALL: [SmokingHistory; 6] = [
        SmokingHistory::Never,
        SmokingHistory::NoInfo,
        SmokingHistory::Current,
        SmokingHistory::Former,
        SmokingHistory::Ever,
        SmokingHistory::NotCurrent,
    ];

    /// Category label as it appears in the training data
    pub fn as_str(&self) -> &'static str {
        match self {
            SmokingHistory::Never => "never",
            SmokingHistory::NoInfo => "No Info",
            SmokingHistory::Current => "current",
            SmokingHistory::Former => "former",
            SmokingHistory::Ever => "ever",
            SmokingHistory::NotCurrent => "not current",
        }
    }
}

/// Raw patient record submitted for prediction or validation.
///
/// Range constraints are declared with `validator` and checked at the HTTP
/// boundary before the record reaches the inference pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct FeatureRecord {
    pub gender: Gender,

    #[validate(range(min = 0.0, max = 120.0))]
    pub age: f64,

    #[validate(range(min = 0, max = 1))]
    pub hypertension: u8,

    #[validate(range(min = 0, max = 1))]
    pub heart_disease: u8,

    pub smoking_history: SmokingHistory,

    #[validate(range(min = 10.0, max = 80.0))]
    pub bmi: f64,

    #[serde(rename = "HbA1c_level")]
    #[validate(range(min = 3.5, max = 15.0))]
    pub hba1c_level: f64,

    #[validate(range(min = 50.0, max = 400.0))]
    pub blood_glucose_level: f64,
}
