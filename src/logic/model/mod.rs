//! Model Module - Risk inference
//!
//! - `estimator.rs`: classifier evaluation (logistic, tree ensemble)
//! - `inference.rs`: single-record prediction engine
//! - `batch.rs`: batch orchestration with per-item failure isolation

pub mod estimator;
pub mod inference;
pub mod batch;

// Re-export common types
pub use batch::{BatchOrchestrator, BatchResult, FailedItem};
pub use estimator::{Classifier, Estimator};
pub use inference::{PredictionEngine, PredictionError, DEFAULT_TIMEOUT};
