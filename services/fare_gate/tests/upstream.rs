//! The HTTP prediction client against a local stand-in for the model server.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use fare_adapter::{HttpPredictionClient, ModelName, PredictError, PredictionClient};
use fare_gate::config::GateConfig;
use fare_gate::AppState;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone, Copy)]
enum Mode {
    Predict(f64),
    InBandError,
    ErrorStatus,
    PlainStatus,
    Stall,
}

#[derive(Debug, Clone)]
struct Seen {
    path: String,
    body: Value,
    auth: Option<String>,
}

#[derive(Clone)]
struct Fake {
    mode: Mode,
    seen: Arc<Mutex<Vec<Seen>>>,
}

async fn fake_predict(
    State(fake): State<Fake>,
    Path(rest): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    fake.seen.lock().unwrap().push(Seen { path: rest, body: body.clone(), auth });
    match fake.mode {
        Mode::Predict(fare) => {
            let n = body["instances"].as_array().map(Vec::len).unwrap_or(0);
            Json(json!({ "predictions": vec![fare; n] })).into_response()
        }
        Mode::InBandError => Json(json!({ "error": "Prediction failed: unknown feature" })).into_response(),
        Mode::ErrorStatus => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "code": 404, "message": "Field: name Error: model not found" } })),
        )
            .into_response(),
        Mode::PlainStatus => (StatusCode::SERVICE_UNAVAILABLE, "try later").into_response(),
        Mode::Stall => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "predictions": [0.0] })).into_response()
        }
    }
}

async fn spawn_fake(mode: Mode) -> (SocketAddr, Arc<Mutex<Vec<Seen>>>, tokio::task::JoinHandle<()>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v1/*rest", post(fake_predict))
        .with_state(Fake { mode, seen: seen.clone() });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, seen, handle)
}

fn model() -> ModelName {
    ModelName::new("taxi", "fare", Some("v1".into()))
}

// ── Client ───────────────────────────────────────────────────────

#[tokio::test]
async fn client_posts_instances_to_model_resource() {
    let (addr, seen, _h) = spawn_fake(Mode::Predict(17.5)).await;
    let client = HttpPredictionClient::new(format!("http://{addr}"))
        .with_token(Some("secret".into()));
    let preds = client
        .predict(&model(), vec![json!({"passenger_count": 2.0})])
        .await
        .unwrap();
    assert_eq!(preds, vec![json!(17.5)]);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, "projects/taxi/models/fare/versions/v1:predict");
    assert_eq!(seen[0].body, json!({"instances": [{"passenger_count": 2.0}]}));
    assert_eq!(seen[0].auth.as_deref(), Some("Bearer secret"));
}

#[tokio::test]
async fn client_without_version_or_token() {
    let (addr, seen, _h) = spawn_fake(Mode::Predict(1.0)).await;
    let client = HttpPredictionClient::new(format!("http://{addr}/"));
    client
        .predict(&ModelName::new("taxi", "fare", None), vec![json!({})])
        .await
        .unwrap();
    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].path, "projects/taxi/models/fare:predict");
    assert!(seen[0].auth.is_none());
}

#[tokio::test]
async fn in_band_error_is_upstream_error() {
    let (addr, _seen, _h) = spawn_fake(Mode::InBandError).await;
    let client = HttpPredictionClient::new(format!("http://{addr}"));
    let err = client.predict(&model(), vec![json!({})]).await.unwrap_err();
    match err {
        PredictError::Upstream(msg) => assert_eq!(msg, "Prediction failed: unknown feature"),
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_status_with_body_uses_service_message() {
    let (addr, _seen, _h) = spawn_fake(Mode::ErrorStatus).await;
    let client = HttpPredictionClient::new(format!("http://{addr}"));
    let err = client.predict(&model(), vec![json!({})]).await.unwrap_err();
    assert_eq!(err.to_string(), "upstream: Field: name Error: model not found");
}

#[tokio::test]
async fn plain_error_status_is_status_error() {
    let (addr, _seen, _h) = spawn_fake(Mode::PlainStatus).await;
    let client = HttpPredictionClient::new(format!("http://{addr}"));
    let err = client.predict(&model(), vec![json!({})]).await.unwrap_err();
    match err {
        PredictError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "try later");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn configured_timeout_is_reported() {
    let (addr, _seen, _h) = spawn_fake(Mode::Stall).await;
    let client = HttpPredictionClient::new(format!("http://{addr}")).with_timeout_ms(Some(100));
    let err = client.predict(&model(), vec![json!({})]).await.unwrap_err();
    assert!(err.is_timeout(), "got {err:?}");
}

#[tokio::test]
async fn unreachable_service_is_http_error() {
    // bind then drop to get a port nobody listens on
    let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
    let client = HttpPredictionClient::new(format!("http://{addr}"));
    let err = client.predict(&model(), vec![json!({})]).await.unwrap_err();
    assert!(matches!(err, PredictError::Http(_)), "got {err:?}");
}

// ── Gate wired to the HTTP client ────────────────────────────────

async fn gate_against(mode: Mode, timeout_ms: Option<u64>) -> (String, reqwest::Client, Vec<tokio::task::JoinHandle<()>>) {
    gate_with(
        mode,
        GateConfig {
            upstream_timeout_ms: timeout_ms,
            ..GateConfig::default()
        },
    )
    .await
}

async fn gate_with(mode: Mode, config: GateConfig) -> (String, reqwest::Client, Vec<tokio::task::JoinHandle<()>>) {
    let (fake_addr, _seen, fake) = spawn_fake(mode).await;
    let config = GateConfig {
        endpoint: format!("http://{fake_addr}"),
        ..config
    };
    let (addr, gate) = fare_gate::test::spawn(AppState::from_config(config)).await;
    (format!("http://{addr}"), reqwest::Client::new(), vec![fake, gate])
}

#[tokio::test]
async fn gate_end_to_end_through_http_client() {
    let (base, http, _h) = gate_against(Mode::Predict(17.5), None).await;
    let body: Value = http
        .get(format!(
            "{base}/predict_fare?pickup_location=40.71,-74.00&dropoff_location=40.75,-73.98&passenger_count=2"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["fare"], json!(17.5));
    assert_eq!(body["params"]["passenger_count"], json!(2.0));
}

#[tokio::test]
async fn gate_maps_upstream_failures_to_5xx() {
    for (mode, status) in [
        (Mode::InBandError, 502),
        (Mode::ErrorStatus, 502),
        (Mode::PlainStatus, 502),
    ] {
        let (base, http, _h) = gate_against(mode, None).await;
        let resp = http.get(format!("{base}/predict_fare")).send().await.unwrap();
        assert_eq!(resp.status(), status);
    }
}

#[tokio::test]
async fn gate_reports_upstream_timeout_as_504() {
    let (base, http, _h) = gate_against(Mode::Stall, Some(100)).await;
    let resp = http.get(format!("{base}/predict_fare")).send().await.unwrap();
    assert_eq!(resp.status(), 504);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "upstream_timeout");
}

#[tokio::test]
async fn request_deadline_without_upstream_timeout_is_json_504() {
    let config = GateConfig {
        upstream_timeout_ms: None,
        request_timeout: Some(Duration::from_millis(200)),
        ..GateConfig::default()
    };
    let (base, http, _h) = gate_with(Mode::Stall, config).await;
    let resp = http.get(format!("{base}/predict_fare")).send().await.unwrap();
    assert_eq!(resp.status(), 504);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "upstream_timeout");
    assert!(body["message"].as_str().unwrap().contains("200ms"), "{body}");
}
