//! Artifacts Module - Model + scaler lifecycle
//!
//! Owns the loaded classifier and scaler and tracks their load state.
//!
//! # Architecture
//! - `types.rs`: `ModelArtifact`, `ScalerArtifact` (JSON formats)
//! - `storage.rs`: read-only loading with checksum + integrity checks
//!
//! # Publication
//! Loads happen outside the slot lock. The resulting pair is published in
//! a single write-lock section, so readers see either the old pair or the
//! new pair, never a mix.
//!
//! # Failure Strategy
//! Missing/corrupt artifact → slot `Failed`, handle `None`, error logged.
//! Nothing is raised to the caller; readiness simply reports false.

pub mod types;
pub mod storage;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::models::{ModelInfo, ModelMetrics, ReadinessStatus};

pub use storage::{ArtifactError, ArtifactPaths, LoadedModel, LoadedScaler};
pub use types::{ModelArtifact, ScalerArtifact};

// ============================================================================
// STATE
// ============================================================================

/// Load state of one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactStatus {
    Unloaded,
    Loaded,
    Failed(String),
}

/// Whether readiness probes attempt recovery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecoveryPolicy {
    /// Probes are pure reads; recovery needs `ensure_loaded()` or `reload()`
    #[default]
    Manual,
    /// Every probe first retries a failed/missing load
    RetryOnProbe,
}

/// Consistent model/scaler pair for one prediction
#[derive(Debug, Clone)]
pub struct ArtifactSnapshot {
    pub model: Arc<LoadedModel>,
    pub scaler: Arc<LoadedScaler>,
}

struct Slots {
    model: Option<Arc<LoadedModel>>,
    scaler: Option<Arc<LoadedScaler>>,
    model_status: ArtifactStatus,
    scaler_status: ArtifactStatus,
}

impl Slots {
    fn empty() -> Self {
        Self {
            model: None,
            scaler: None,
            model_status: ArtifactStatus::Unloaded,
            scaler_status: ArtifactStatus::Unloaded,
        }
    }
}

/// Outcome of one load attempt, before publication
enum Attempt<T> {
    Skipped,
    Done(Result<Arc<T>, String>),
}

// ============================================================================
// ARTIFACT STORE
// ============================================================================

pub struct ArtifactStore {
    paths: ArtifactPaths,
    policy: RecoveryPolicy,
    slots: RwLock<Slots>,
    /// Serializes loaders; readers never take it
    load_lock: Mutex<()>,
    /// Number of artifact deserializations performed
    loads: AtomicU64,
}

impl ArtifactStore {
    pub fn new(paths: ArtifactPaths, policy: RecoveryPolicy) -> Self {
        Self {
            paths,
            policy,
            slots: RwLock::new(Slots::empty()),
            load_lock: Mutex::new(()),
            loads: AtomicU64::new(0),
        }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    pub fn policy(&self) -> RecoveryPolicy {
        self.policy
    }

    /// Load whichever artifact is missing. Loaded artifacts are never
    /// re-read. Returns readiness after the attempt.
    pub fn ensure_loaded(&self) -> bool {
        if self.is_ready() {
            return true;
        }

        let _guard = self.load_lock.lock();

        // Another loader may have finished while we waited
        let (need_model, need_scaler) = {
            let slots = self.slots.read();
            (slots.model.is_none(), slots.scaler.is_none())
        };

        let model = if need_model { Attempt::Done(self.load_model()) } else { Attempt::Skipped };
        let scaler = if need_scaler { Attempt::Done(self.load_scaler()) } else { Attempt::Skipped };

        self.publish(model, scaler)
    }

    /// Discard cached artifacts and load both from disk.
    /// Returns readiness after the attempt.
    pub fn reload(&self) -> bool {
        let _guard = self.load_lock.lock();

        tracing::info!("Reloading model and scaler from disk");

        let model = Attempt::Done(self.load_model());
        let scaler = Attempt::Done(self.load_scaler());

        self.publish(model, scaler)
    }

    /// True iff both artifacts are loaded. Pure read.
    pub fn is_ready(&self) -> bool {
        let slots = self.slots.read();
        slots.model.is_some() && slots.scaler.is_some()
    }

    /// Readiness probe honouring the recovery policy
    pub fn probe(&self) -> bool {
        match self.policy {
            RecoveryPolicy::RetryOnProbe => self.ensure_loaded(),
            RecoveryPolicy::Manual => self.is_ready(),
        }
    }

    /// Current model/scaler pair, if both are loaded
    pub fn artifacts(&self) -> Option<ArtifactSnapshot> {
        let slots = self.slots.read();
        match (&slots.model, &slots.scaler) {
            (Some(model), Some(scaler)) => Some(ArtifactSnapshot {
                model: Arc::clone(model),
                scaler: Arc::clone(scaler),
            }),
            _ => None,
        }
    }

    pub fn model_status(&self) -> ArtifactStatus {
        self.slots.read().model_status.clone()
    }

    pub fn scaler_status(&self) -> ArtifactStatus {
        self.slots.read().scaler_status.clone()
    }

    pub fn readiness_status(&self) -> ReadinessStatus {
        let slots = self.slots.read();
        let model_loaded = slots.model.is_some();
        let scaler_loaded = slots.scaler.is_some();
        let ready = model_loaded && scaler_loaded;

        ReadinessStatus {
            ready,
            model_loaded,
            scaler_loaded,
            message: if ready {
                "All systems ready".to_string()
            } else {
                "Model or scaler not loaded".to_string()
            },
        }
    }

    /// Version of the loaded model
    pub fn current_version(&self) -> Option<String> {
        self.slots
            .read()
            .model
            .as_ref()
            .map(|m| m.artifact.version.clone())
    }

    pub fn model_info(&self) -> Option<ModelInfo> {
        let slots = self.slots.read();
        let model = slots.model.as_ref()?;
        let artifact = &model.artifact;

        Some(ModelInfo {
            algorithm: artifact.algorithm.clone(),
            trained_at: artifact.trained_at,
            roc_auc: artifact.metrics.roc_auc,
            features: artifact.expected_columns.len(),
            version: artifact.version.clone(),
            schema_hash: model.schema_hash,
            checksum: model.checksum.clone(),
            loaded_at: model.loaded_at,
        })
    }

    pub fn metrics(&self) -> Option<ModelMetrics> {
        self.slots
            .read()
            .model
            .as_ref()
            .map(|m| m.artifact.metrics.clone())
    }

    /// Number of artifact files deserialized so far
    pub fn load_count(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    fn load_model(&self) -> Result<Arc<LoadedModel>, String> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        match storage::load_model(&self.paths.model) {
            Ok(model) => {
                tracing::info!(
                    version = %model.artifact.version,
                    columns = model.artifact.expected_columns.len(),
                    "Model loaded successfully from {}",
                    self.paths.model.display()
                );
                Ok(Arc::new(model))
            }
            Err(e) => {
                tracing::error!("Error loading model: {}", e);
                Err(e.to_string())
            }
        }
    }

    fn load_scaler(&self) -> Result<Arc<LoadedScaler>, String> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        match storage::load_scaler(&self.paths.scaler) {
            Ok(scaler) => {
                tracing::info!("Scaler loaded successfully from {}", self.paths.scaler.display());
                Ok(Arc::new(scaler))
            }
            Err(e) => {
                tracing::error!("Error loading scaler: {}", e);
                Err(e.to_string())
            }
        }
    }

    /// Swap in the attempted artifacts under one write lock
    fn publish(&self, model: Attempt<LoadedModel>, scaler: Attempt<LoadedScaler>) -> bool {
        let mut slots = self.slots.write();

        if let Attempt::Done(result) = model {
            match result {
                Ok(new_model) => {
                    if let Some(old) = &slots.model {
                        if old.schema_hash != new_model.schema_hash {
                            tracing::warn!(
                                old_version = %old.artifact.version,
                                new_version = %new_model.artifact.version,
                                "Model schema changed ({:08x} -> {:08x}); prediction input shape differs",
                                old.schema_hash,
                                new_model.schema_hash
                            );
                        }
                    }
                    slots.model = Some(new_model);
                    slots.model_status = ArtifactStatus::Loaded;
                }
                Err(reason) => {
                    slots.model = None;
                    slots.model_status = ArtifactStatus::Failed(reason);
                }
            }
        }

        if let Attempt::Done(result) = scaler {
            match result {
                Ok(new_scaler) => {
                    slots.scaler = Some(new_scaler);
                    slots.scaler_status = ArtifactStatus::Loaded;
                }
                Err(reason) => {
                    slots.scaler = None;
                    slots.scaler_status = ArtifactStatus::Failed(reason);
                }
            }
        }

        slots.model.is_some() && slots.scaler.is_some()
    }
}

impl std::fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("paths", &self.paths)
            .field("policy", &self.policy)
            .field("ready", &self.is_ready())
            .finish()
    }
}
