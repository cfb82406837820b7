//! API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! the /api/v1/* endpoints using `tower::ServiceExt::oneshot()`.
//! No binary spawn, no network port — runs in CI without `#[ignore]`.

use heatscope::api::{create_app, DashboardState};
use heatscope::config::AppConfig;
use heatscope::dataset::ReferenceDataset;
use heatscope::pipeline::{run_cycle, AppState};
use heatscope::types::{LiveReadings, ReferenceRow, TelemetryStatus};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceExt;

fn test_dataset() -> ReferenceDataset {
    ReferenceDataset::from_rows(vec![
        ReferenceRow {
            thermal_cond: 100.0,
            block_size: 10.0,
            source_temp: 60.0,
            ambient_temp: 25.0,
            avg_temp: 45.2,
            max_temp: 58.1,
            center_temp: 50.3,
        },
        ReferenceRow {
            thermal_cond: 400.0,
            block_size: 40.0,
            source_temp: 120.0,
            ambient_temp: 40.0,
            avg_temp: 85.0,
            max_temp: 110.0,
            center_temp: 95.0,
        },
    ])
}

fn create_test_state() -> DashboardState {
    DashboardState::new(
        Arc::new(AppConfig::default()),
        Arc::new(test_dataset()),
        Arc::new(RwLock::new(AppState::default())),
    )
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// All always-available GET endpoints should return 200.
#[tokio::test]
async fn test_v1_get_endpoints_return_200() {
    let endpoints = ["/api/v1/health", "/api/v1/status", "/api/v1/limits", "/api/v1/live"];

    for endpoint in &endpoints {
        let app = create_app(create_test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri(*endpoint)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            resp.status().is_success(),
            "GET {endpoint} returned status {}",
            resp.status()
        );
    }
}

/// Every v1 response carries the standard envelope.
#[tokio::test]
async fn test_v1_health_envelope_shape() {
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["meta"]["version"], "1");
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["dataset_rows"], 2);
}

/// Limits endpoint reflects the configured ranges in field order.
#[tokio::test]
async fn test_v1_limits_contents() {
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/limits")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_json(resp).await;
    let entries = json["data"].as_array().unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0]["field"], "ThermalCond");
    assert_eq!(entries[0]["min"], 50.0);
    assert_eq!(entries[0]["max"], 500.0);
    assert_eq!(entries[3]["field"], "AmbientTemp");
    assert_eq!(entries[3]["default"], 25.0);
}

/// Snapshot is 404 before the first cycle and 200 after one is published.
#[tokio::test]
async fn test_v1_snapshot_lifecycle() {
    let state = create_test_state();

    let resp = create_app(state.clone())
        .oneshot(
            Request::builder()
                .uri("/api/v1/snapshot")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Publish one cycle directly into shared state.
    {
        let snapshot = run_cycle(
            &state.config,
            &state.dataset,
            &LiveReadings::default(),
            TelemetryStatus::Disabled,
            1,
        );
        let mut app_state = state.app_state.write().await;
        app_state.latest = Some(snapshot);
        app_state.cycles_completed = 1;
    }

    let resp = create_app(state)
        .oneshot(
            Request::builder()
                .uri("/api/v1/snapshot")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["cycle"], 1);
    assert!(json["data"]["prediction"].is_object());
}

/// Predict returns the nearest row's outputs and suggestion labels.
#[tokio::test]
async fn test_v1_predict_success() {
    let app = create_app(create_test_state());

    let body = serde_json::json!({
        "thermal_cond": 400.0,
        "block_size": 40.0,
        "source_temp": 120.0,
        "ambient_temp": 40.0,
    });
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["avg_temp"], 85.0);
    assert_eq!(json["data"]["max_temp"], 110.0);
    assert_eq!(json["data"]["center_temp"], 95.0);
    assert_eq!(json["data"]["coolant"], "Liquid Nitrogen");
    assert_eq!(json["data"]["material"], "Copper");
    assert_eq!(json["data"]["nearest_index"], 1);
    assert_eq!(json["data"]["nearest"]["source_temp"], 120.0);
}

/// Out-of-range inputs return 400 with one message per violation.
#[tokio::test]
async fn test_v1_predict_out_of_range() {
    let app = create_app(create_test_state());

    let body = serde_json::json!({
        "thermal_cond": 501.0,
        "block_size": 10.0,
        "source_temp": 60.0,
        "ambient_temp": 25.0,
    });
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["error"]["code"], "OUT_OF_RANGE");
    let details = json["error"]["details"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0], "ThermalCond should be between 50 and 500");
}

/// Boundary values are accepted (ranges are inclusive).
#[tokio::test]
async fn test_v1_predict_boundary_values_accepted() {
    let app = create_app(create_test_state());

    let body = serde_json::json!({
        "thermal_cond": 50.0,
        "block_size": 5.0,
        "source_temp": 30.0,
        "ambient_temp": 0.0,
    });
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

/// Non-finite inputs never reach the engine: either the JSON layer or
/// the finite check rejects them with a client error.
#[tokio::test]
async fn test_v1_predict_rejects_non_finite() {
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"thermal_cond":1e999,"block_size":10,"source_temp":60,"ambient_temp":25}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        resp.status().is_client_error(),
        "expected 4xx, got {}",
        resp.status()
    );
}

/// Manual refresh publishes a snapshot and bumps the cycle counter.
#[tokio::test]
async fn test_v1_manual_refresh() {
    let state = create_test_state();
    let app = create_app(state.clone());

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["cycle"], 1);

    let app_state = state.app_state.read().await;
    assert_eq!(app_state.cycles_completed, 1);
    assert!(app_state.latest.is_some());
}

/// Legacy /health endpoint still answers at the root.
#[tokio::test]
async fn test_legacy_health() {
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "ok");
}

/// Unmatched non-API paths serve the embedded dashboard page.
#[tokio::test]
async fn test_dashboard_fallback() {
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));
}

/// Unmatched /api/ paths are 404, not the dashboard page.
#[tokio::test]
async fn test_unknown_api_path_is_404() {
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
