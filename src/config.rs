//! Configuration module

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::logic::artifacts::storage::{DEFAULT_MODEL_PATH, DEFAULT_SCALER_PATH};
use crate::logic::artifacts::{ArtifactPaths, RecoveryPolicy};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory relative artifact paths are resolved against
    pub artifact_root: PathBuf,

    /// Serialized classifier
    pub model_path: PathBuf,

    /// Serialized scaler
    pub scaler_path: PathBuf,

    /// Per-prediction deadline in milliseconds
    pub prediction_timeout_ms: u64,

    /// Largest accepted batch (predict and validate)
    pub max_batch_size: usize,

    /// Readiness probes retry failed loads
    pub retry_on_probe: bool,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            artifact_root: PathBuf::from("."),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            scaler_path: PathBuf::from(DEFAULT_SCALER_PATH),
            prediction_timeout_ms: 2000,
            max_batch_size: 1000,
            retry_on_probe: false,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            artifact_root: env::var("ARTIFACT_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifact_root),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            scaler_path: env::var("SCALER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.scaler_path),

            prediction_timeout_ms: env::var("PREDICTION_TIMEOUT_MS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.prediction_timeout_ms),

            max_batch_size: env::var("MAX_BATCH_SIZE")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.max_batch_size),

            retry_on_probe: env::var("RETRY_ON_PROBE")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.retry_on_probe),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),
        }
    }

    /// Artifact locations; absolute paths are kept as-is
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::under(&self.artifact_root, &self.model_path, &self.scaler_path)
    }

    pub fn recovery_policy(&self) -> RecoveryPolicy {
        if self.retry_on_probe {
            RecoveryPolicy::RetryOnProbe
        } else {
            RecoveryPolicy::Manual
        }
    }

    pub fn prediction_timeout(&self) -> Duration {
        Duration::from_millis(self.prediction_timeout_ms)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
