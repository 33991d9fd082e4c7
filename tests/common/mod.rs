//! Shared fixtures for API tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use glucotrack::{create_router, AppState, Config};

pub const MODEL_FILE: &str = "models/lgbm_best_model.json";
pub const SCALER_FILE: &str = "models/scaler.json";

/// Artifact root holding a copy of the shipped sample artifacts
pub struct Fixture {
    pub dir: TempDir,
    pub state: AppState,
}

impl Fixture {
    /// Artifacts on disk, not yet loaded
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Artifacts on disk and loaded
    pub fn ready() -> Self {
        let fixture = Self::new();
        assert!(fixture.state.store.ensure_loaded());
        fixture
    }

    /// Empty artifact root
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            artifact_root: dir.path().to_path_buf(),
            ..Config::default()
        };
        Self {
            state: AppState::new(config),
            dir,
        }
    }

    pub fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        install_samples(dir.path());

        let mut config = Config {
            artifact_root: dir.path().to_path_buf(),
            ..Config::default()
        };
        adjust(&mut config);

        Self {
            state: AppState::new(config),
            dir,
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    pub fn model_json(&self) -> Value {
        serde_json::from_slice(&fs::read(self.path(MODEL_FILE)).unwrap()).unwrap()
    }

    pub fn write_model(&self, model: &Value) {
        fs::write(self.path(MODEL_FILE), serde_json::to_vec_pretty(model).unwrap()).unwrap();
    }
}

fn install_samples(root: &Path) {
    let shipped = Path::new(env!("CARGO_MANIFEST_DIR"));
    fs::create_dir_all(root.join("models")).unwrap();
    for file in [MODEL_FILE, SCALER_FILE] {
        fs::copy(shipped.join(file), root.join(file)).unwrap();
    }
}

pub async fn send(router: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, value)
}

pub async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::GET, uri, None).await
}

pub async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, Method::POST, uri, Some(body)).await
}

pub fn patient() -> Value {
    json!({
        "gender": "Female",
        "age": 45.0,
        "hypertension": 0,
        "heart_disease": 0,
        "smoking_history": "never",
        "bmi": 28.5,
        "HbA1c_level": 6.2,
        "blood_glucose_level": 140.0
    })
}

pub fn high_risk_patient() -> Value {
    json!({
        "gender": "Male",
        "age": 70.0,
        "hypertension": 1,
        "heart_disease": 0,
        "smoking_history": "former",
        "bmi": 28.5,
        "HbA1c_level": 9.0,
        "blood_glucose_level": 280.0
    })
}
