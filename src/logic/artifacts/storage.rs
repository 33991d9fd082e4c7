use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::types::{ModelArtifact, ScalerArtifact};
use crate::logic::features::schema_hash;

pub const DEFAULT_MODEL_PATH: &str = "models/lgbm_best_model.json";
pub const DEFAULT_SCALER_PATH: &str = "models/scaler.json";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("corrupt artifact {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
}

/// Locations of the two persisted artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
}

impl ArtifactPaths {
    /// Resolve relative artifact paths against an application root
    pub fn under(root: &Path, model: &Path, scaler: &Path) -> Self {
        Self {
            model: root.join(model),
            scaler: root.join(scaler),
        }
    }
}

/// Deserialized model with load-time metadata
#[derive(Debug)]
pub struct LoadedModel {
    pub artifact: ModelArtifact,
    pub checksum: String,
    pub schema_hash: u32,
    pub loaded_at: DateTime<Utc>,
}

/// Deserialized scaler with load-time metadata
#[derive(Debug)]
pub struct LoadedScaler {
    pub artifact: ScalerArtifact,
    pub checksum: String,
    pub loaded_at: DateTime<Utc>,
}

fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Read, hash and parse one artifact. Never writes.
fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<(T, String), ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let artifact = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok((artifact, checksum(&bytes)))
}

/// Load model artifact from disk with validation
pub fn load_model(path: &Path) -> Result<LoadedModel, ArtifactError> {
    let (artifact, checksum): (ModelArtifact, _) = read_artifact(path)?;

    artifact.check().map_err(|reason| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        reason,
    })?;

    Ok(LoadedModel {
        schema_hash: schema_hash(&artifact.expected_columns),
        artifact,
        checksum,
        loaded_at: Utc::now(),
    })
}

/// Load scaler artifact from disk with validation
pub fn load_scaler(path: &Path) -> Result<LoadedScaler, ArtifactError> {
    let (artifact, checksum): (ScalerArtifact, _) = read_artifact(path)?;

    artifact.check().map_err(|reason| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        reason,
    })?;

    Ok(LoadedScaler {
        artifact,
        checksum,
        loaded_at: Utc::now(),
    })
}
