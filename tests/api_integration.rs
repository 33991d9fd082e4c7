//! End-to-end tests over the HTTP router

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{get, high_risk_patient, patient, post, Fixture};

// ============================================================================
// HEALTH & READINESS
// ============================================================================

#[tokio::test]
async fn test_health_is_always_up() {
    let fixture = Fixture::empty();
    let (status, body) = get(fixture.router(), "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ready_reports_unloaded_then_loaded() {
    let fixture = Fixture::new();

    let (status, body) = get(fixture.router(), "/api/v1/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ready"], false);
    assert_eq!(body["message"], "Model or scaler not loaded");

    let (status, body) = post(fixture.router(), "/api/v1/model/reload", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["model_version"], "lgbm_v1.2");

    let (status, body) = get(fixture.router(), "/api/v1/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["scaler_loaded"], true);
    assert_eq!(body["message"], "All systems ready");
}

#[tokio::test]
async fn test_ready_retries_when_configured() {
    let fixture = Fixture::with_config(|c| c.retry_on_probe = true);

    let (status, _) = get(fixture.router(), "/api/v1/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_retrying_policy_heals_model_routes() {
    let fixture = Fixture::with_config(|c| c.retry_on_probe = true);
    assert!(!fixture.state.store.is_ready());

    let (status, body) = get(fixture.router(), "/api/v1/model/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], "lgbm_v1.2");
}

#[tokio::test]
async fn test_retrying_policy_heals_predict() {
    let fixture = Fixture::with_config(|c| c.retry_on_probe = true);

    let (status, body) = post(fixture.router(), "/api/v1/predict", patient()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_version"], "lgbm_v1.2");
    assert!(fixture.state.store.is_ready());
}

#[tokio::test]
async fn test_manual_policy_routes_do_not_load() {
    let fixture = Fixture::new();

    let (status, _) = post(fixture.router(), "/api/v1/predict", patient()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(fixture.state.store.load_count(), 0);
}

// ============================================================================
// PREDICTION
// ============================================================================

#[tokio::test]
async fn test_predict_reference_patient() {
    let fixture = Fixture::ready();
    let (status, body) = post(fixture.router(), "/api/v1/predict", patient()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk"], 0);
    assert_eq!(body["model_version"], "lgbm_v1.2");
    let probability = body["probability"].as_f64().unwrap();
    assert!((0.0..0.5).contains(&probability));
}

#[tokio::test]
async fn test_predict_high_risk_patient() {
    let fixture = Fixture::ready();
    let (status, body) = post(fixture.router(), "/api/v1/predict", high_risk_patient()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk"], 1);
    assert!(body["probability"].as_f64().unwrap() >= 0.5);
}

#[tokio::test]
async fn test_predict_without_artifacts_is_unavailable() {
    let fixture = Fixture::empty();
    let (status, body) = post(fixture.router(), "/api/v1/predict", patient()).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], 503);
}

#[tokio::test]
async fn test_predict_out_of_range_is_rejected() {
    let fixture = Fixture::ready();
    let mut record = patient();
    record["age"] = json!(150.0);

    let (status, body) = post(fixture.router(), "/api/v1/predict", record).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("age"));
}

#[tokio::test]
async fn test_predict_unknown_category_is_rejected() {
    let fixture = Fixture::ready();
    let mut record = patient();
    record["gender"] = json!("Other");

    let (status, _) = post(fixture.router(), "/api/v1/predict", record).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_predict_past_deadline_is_unavailable() {
    let fixture = Fixture::with_config(|c| c.prediction_timeout_ms = 0);
    assert!(fixture.state.store.ensure_loaded());

    let (status, body) = post(fixture.router(), "/api/v1/predict", patient()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("deadline"));
}

#[tokio::test]
async fn test_predict_with_ordinal_model_is_encoding_mismatch() {
    let fixture = Fixture::new();
    let mut model = fixture.model_json();
    model["expected_columns"][6] = json!("gender");
    fixture.write_model(&model);
    assert!(fixture.state.store.ensure_loaded());

    let (status, body) = post(fixture.router(), "/api/v1/predict", patient()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("gender"));
}

// ============================================================================
// BATCH PREDICTION
// ============================================================================

#[tokio::test]
async fn test_batch_predict_keeps_order() {
    let fixture = Fixture::ready();
    let request = json!({ "data": [patient(), high_risk_patient(), patient()] });

    let (status, body) = post(fixture.router(), "/api/v1/batch-predict", request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processed_count"], 3);
    assert_eq!(body["failed_count"], 0);
    assert!(body["batch_id"].is_string());

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["risk"], 0);
    assert_eq!(results[1]["risk"], 1);
    assert_eq!(results[2], results[0]);
}

#[tokio::test]
async fn test_batch_predict_reports_failed_items_with_fallbacks() {
    let fixture = Fixture::new();
    let mut model = fixture.model_json();
    model["expected_columns"][6] = json!("gender");
    fixture.write_model(&model);
    assert!(fixture.state.store.ensure_loaded());

    let request = json!({ "data": [patient(), high_risk_patient()] });
    let (status, body) = post(fixture.router(), "/api/v1/batch-predict", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processed_count"], 2);
    assert_eq!(body["failed_count"], 2);
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
    assert_eq!(body["errors"][1]["index"], 1);
    for result in body["results"].as_array().unwrap() {
        assert_eq!(result["risk"], 0);
        assert_eq!(result["probability"], 0.0);
        assert_eq!(result["model_version"], "lgbm_v1.2");
    }
}

#[tokio::test]
async fn test_batch_predict_rejects_empty_and_oversized() {
    let fixture = Fixture::with_config(|c| c.max_batch_size = 2);
    assert!(fixture.state.store.ensure_loaded());

    let (status, body) = post(fixture.router(), "/api/v1/batch-predict", json!({ "data": [] })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Empty data list provided");

    let request = json!({ "data": [patient(), patient(), patient()] });
    let (status, body) = post(fixture.router(), "/api/v1/batch-predict", request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("maximum 2"));
}

#[tokio::test]
async fn test_batch_predict_names_invalid_record() {
    let fixture = Fixture::ready();
    let mut bad = patient();
    bad["bmi"] = json!(5.0);

    let request = json!({ "data": [patient(), bad] });
    let (status, body) = post(fixture.router(), "/api/v1/batch-predict", request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().starts_with("record 1"));
}

// ============================================================================
// MODEL METADATA
// ============================================================================

#[tokio::test]
async fn test_model_info_requires_loaded_model() {
    let fixture = Fixture::new();

    let (status, body) = get(fixture.router(), "/api/v1/model/info").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Model not loaded");

    assert!(fixture.state.store.ensure_loaded());
    let (status, body) = get(fixture.router(), "/api/v1/model/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["algorithm"], "LightGBM");
    assert_eq!(body["version"], "lgbm_v1.2");
    assert_eq!(body["features"], 13);
    assert_eq!(body["checksum"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_model_metrics() {
    let fixture = Fixture::ready();
    let (status, body) = get(fixture.router(), "/api/v1/model/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roc_auc"], 0.982);
    assert_eq!(body["confusion_matrix"], json!([[85432, 3421], [2156, 8073]]));
}

#[tokio::test]
async fn test_feature_names_describe_inputs() {
    let fixture = Fixture::empty();
    let (status, body) = get(fixture.router(), "/api/v1/model/feature-names").await;

    assert_eq!(status, StatusCode::OK);
    let features = body["features"].as_array().unwrap();
    assert_eq!(features.len(), 8);
    assert!(features.iter().any(|f| f["name"] == "HbA1c_level"));
}

#[tokio::test]
async fn test_engine_status_counts_predictions() {
    let fixture = Fixture::ready();
    post(fixture.router(), "/api/v1/predict", patient()).await;
    post(fixture.router(), "/api/v1/predict", high_risk_patient()).await;

    let (status, body) = get(fixture.router(), "/api/v1/model/engine-status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
    assert_eq!(body["inference_count"], 2);
    assert_eq!(body["failure_count"], 0);
}

#[tokio::test]
async fn test_failed_reload_discards_artifacts_until_restored() {
    let fixture = Fixture::ready();
    let original = fixture.model_json();
    std::fs::write(fixture.path(common::MODEL_FILE), "{ not json").unwrap();

    let (status, body) = post(fixture.router(), "/api/v1/model/reload", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);

    let (status, _) = post(fixture.router(), "/api/v1/predict", patient()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    fixture.write_model(&original);
    let (_, body) = post(fixture.router(), "/api/v1/model/reload", json!({})).await;
    assert_eq!(body["success"], true);

    let (status, body) = post(fixture.router(), "/api/v1/predict", patient()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_version"], "lgbm_v1.2");
}

// ============================================================================
// DATA VALIDATION
// ============================================================================

#[tokio::test]
async fn test_validate_flags_young_heart_disease() {
    let fixture = Fixture::empty();
    let mut record = patient();
    record["age"] = json!(20.0);
    record["heart_disease"] = json!(1);

    let (status, body) = post(fixture.router(), "/api/v1/data/validate", record).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(
        body["warnings"],
        json!(["Heart disease in patient under 30 is uncommon - verify data"])
    );
}

#[tokio::test]
async fn test_validate_batch_preserves_order() {
    let fixture = Fixture::empty();
    let mut extreme = patient();
    extreme["blood_glucose_level"] = json!(350.0);

    let (status, body) = post(
        fixture.router(),
        "/api/v1/data/validate-batch",
        json!([patient(), extreme]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0]["warnings"].as_array().unwrap().is_empty());
    assert_eq!(results[1]["warnings"].as_array().unwrap().len(), 1);
}
