//! GlucoTrack - Diabetes risk prediction serving
//!
//! Serves a pre-trained tabular classifier over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       GLUCOTRACK API                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────────┐   ┌────────────────┐  │
//! │  │ Handlers  │──▶│ BatchOrchestrator│──▶│PredictionEngine│  │
//! │  │  (Axum)   │   └──────────────────┘   └───────┬────────┘  │
//! │  └─────┬─────┘                                  │           │
//! │        │         ┌──────────────────┐   ┌───────▼────────┐  │
//! │        └────────▶│ValidationAdvisor │   │ FeatureEncoder │  │
//! │                  └──────────────────┘   └───────┬────────┘  │
//! │                                         ┌───────▼────────┐  │
//! │                                         │ ArtifactStore  │  │
//! │                                         │ (model+scaler) │  │
//! │                                         └────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod models;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::Config;
pub use error::{AppError, AppResult};

use logic::artifacts::ArtifactStore;
use logic::model::{BatchOrchestrator, PredictionEngine};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ArtifactStore>,
    pub engine: PredictionEngine,
    pub batch: BatchOrchestrator,
    pub config: Config,
}

impl AppState {
    /// Wire the serving graph from configuration. Artifacts are not loaded yet.
    pub fn new(config: Config) -> Self {
        let store = Arc::new(ArtifactStore::new(
            config.artifact_paths(),
            config.recovery_policy(),
        ));
        let engine = PredictionEngine::new(Arc::clone(&store), config.prediction_timeout());
        let batch = BatchOrchestrator::new(engine.clone());

        Self {
            store,
            engine,
            batch,
            config,
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Health
        .route("/health", get(handlers::health::check))
        .route("/ready", get(handlers::health::ready))

        // Predictions
        .route("/predict", post(handlers::predict::predict))
        .route("/batch-predict", post(handlers::predict::batch_predict))

        // Model
        .route("/model/info", get(handlers::model::info))
        .route("/model/metrics", get(handlers::model::metrics))
        .route("/model/feature-names", get(handlers::model::feature_names))
        .route("/model/engine-status", get(handlers::model::engine_status))
        .route("/model/reload", post(handlers::model::reload))

        // Validation
        .route("/data/validate", post(handlers::validate::validate))
        .route("/data/validate-batch", post(handlers::validate::validate_batch));

    Router::new()
        .nest("/api/v1", api)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
