use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use salespro::{
    app::{router, AppState},
    error::SubmissionError,
    models::{Factors, PredictionResult, ValidatedInput},
    services::{HttpPredictionClient, PredictionService, StorageService},
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tower::ServiceExt;

/// Answers from a fixed list, keyed by store id.
struct FixedPredictor {
    answers: HashMap<i64, Result<PredictionResult, SubmissionError>>,
}

#[async_trait]
impl PredictionService for FixedPredictor {
    async fn predict(&self, input: &ValidatedInput) -> Result<PredictionResult, SubmissionError> {
        self.answers
            .get(&input.store_id)
            .cloned()
            .unwrap_or_else(|| Err(SubmissionError::Unreachable("no answer".into())))
    }

    fn endpoint(&self) -> &str {
        "fixed://predict"
    }
}

/// Blocks each call until the test releases it, so resolution order can be
/// chosen independently of issue order.
struct GatedPredictor {
    started: mpsc::UnboundedSender<i64>,
    gates: Mutex<HashMap<i64, oneshot::Receiver<PredictionResult>>>,
}

#[async_trait]
impl PredictionService for GatedPredictor {
    async fn predict(&self, input: &ValidatedInput) -> Result<PredictionResult, SubmissionError> {
        let gate = self.gates.lock().unwrap().remove(&input.store_id);
        let _ = self.started.send(input.store_id);
        match gate {
            Some(rx) => rx
                .await
                .map_err(|_| SubmissionError::Unreachable("gate dropped".into())),
            None => Err(SubmissionError::Unreachable("no gate".into())),
        }
    }

    fn endpoint(&self) -> &str {
        "gated://predict"
    }
}

fn result(prediction: f64, confidence: f64) -> PredictionResult {
    PredictionResult {
        prediction,
        confidence,
        factors: Factors::default(),
    }
}

fn app_with(predictor: Arc<dyn PredictionService>) -> Router {
    let state = AppState::new(
        Arc::new(StorageService::in_memory()),
        predictor,
        None,
        Duration::from_secs(60),
    );
    router(state)
}

fn default_app() -> Router {
    let mut answers = HashMap::new();
    answers.insert(1, Ok(result(42.5, 90.0)));
    answers.insert(
        7,
        Err(SubmissionError::ServerRejected("model unavailable".into())),
    );
    app_with(Arc::new(FixedPredictor { answers }))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn sign_in(app: &Router) {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": "analyst@salespro.io", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "analyst");
}

fn form(store_id: i64) -> Value {
    json!({
        "store_id": store_id,
        "sku_id": 2,
        "total_price": 10.0,
        "base_price": 8.0,
        "is_featured_sku": true,
        "is_display_sku": false
    })
}

async fn toast_titles(app: &Router) -> Vec<String> {
    let (_, body) = send_json(app, Method::GET, "/api/toasts", None).await;
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let app = default_app();

    let (status, body) = send_json(&app, Method::POST, "/api/predict", Some(form(1))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "UNAUTHORIZED");

    let (status, _) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn invalid_credentials_are_rejected() {
    let app = default_app();
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": "", "password": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = default_app();
    sign_in(&app).await;

    let (status, _) = send_json(&app, Method::POST, "/api/auth/logout", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, Method::GET, "/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_form_reports_all_fields_and_raises_a_toast() {
    let app = default_app();
    sign_in(&app).await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/predict",
        Some(json!({ "base_price": 100.0, "total_price": 50.0 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = &body["field_errors"];
    assert_eq!(fields["store_id"][0], "Store ID must be a positive number");
    assert_eq!(fields["sku_id"][0], "SKU ID must be a positive number");
    assert_eq!(fields["base_price"][0], "Base price cannot exceed total price");
    assert!(fields.get("total_price").is_none());

    assert_eq!(toast_titles(&app).await, vec!["Validation Error"]);
}

#[tokio::test]
async fn unreadable_form_body_is_a_json_error_with_a_toast() {
    let app = default_app();
    sign_in(&app).await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/predict",
        Some(json!({ "store_id": "abc", "sku_id": 2, "total_price": 10, "base_price": 8 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "MALFORMED_FORM");
    assert!(body["error"].as_str().unwrap().contains("store_id"));

    assert_eq!(toast_titles(&app).await, vec!["Validation Error"]);

    let (status, _) = send_json(&app, Method::GET, "/api/prediction", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn successful_prediction_can_be_read_exported_and_shared() {
    let app = default_app();
    sign_in(&app).await;

    let (status, body) = send_json(&app, Method::POST, "/api/predict", Some(form(1))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["applied"], true);
    assert_eq!(body["data"]["result"]["prediction"], 42.5);

    let (status, body) = send_json(&app, Method::GET, "/api/prediction", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["input"]["store_id"], 1);

    let (status, csv) = send(&app, Method::GET, "/api/prediction/export", None).await;
    assert_eq!(status, StatusCode::OK);
    let csv = String::from_utf8(csv).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Prediction,Confidence,Store ID,SKU ID,Total Price,Base Price,Featured,Display",
            "42.5,90.0%,1,2,10,8,Yes,No",
        ]
    );

    let (status, body) = send_json(&app, Method::POST, "/api/prediction/share", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "copied");

    let (_, body) = send_json(&app, Method::GET, "/api/clipboard", None).await;
    assert!(body["data"]["text"]
        .as_str()
        .unwrap()
        .starts_with("Sales Prediction: 42.5 units (90.0% confidence)"));

    assert_eq!(
        toast_titles(&app).await,
        vec!["Export Successful", "Copied to Clipboard"]
    );
}

#[tokio::test]
async fn export_without_prediction_is_not_found() {
    let app = default_app();
    sign_in(&app).await;

    let (status, body) = send_json(&app, Method::GET, "/api/prediction/export", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "NO_PREDICTION");
}

#[tokio::test]
async fn server_rejection_surfaces_as_toast_and_keeps_old_result() {
    let app = default_app();
    sign_in(&app).await;

    send_json(&app, Method::POST, "/api/predict", Some(form(1))).await;
    let (status, body) = send_json(&app, Method::POST, "/api/predict", Some(form(7))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "model unavailable");

    let (_, toasts) = send_json(&app, Method::GET, "/api/toasts", None).await;
    assert_eq!(toasts["data"][0]["title"], "Prediction Failed");
    assert_eq!(toasts["data"][0]["message"], "model unavailable");
    assert_eq!(toasts["data"][0]["type"], "error");

    let (_, body) = send_json(&app, Method::GET, "/api/prediction", None).await;
    assert_eq!(body["data"]["result"]["prediction"], 42.5);
}

#[tokio::test]
async fn unreachable_model_shows_generic_server_error() {
    let app = default_app();
    sign_in(&app).await;

    let (status, body) = send_json(&app, Method::POST, "/api/predict", Some(form(3))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error_code"], "UPSTREAM_UNREACHABLE");
    assert_eq!(body["error"], "Could not reach prediction server");
    assert_eq!(toast_titles(&app).await, vec!["Server Error"]);
}

#[tokio::test]
async fn newest_submission_wins_when_older_one_resolves_last() {
    let (started_tx, mut started_rx) = mpsc::unbounded_channel();
    let (release_a, gate_a) = oneshot::channel();
    let (release_b, gate_b) = oneshot::channel();

    let mut gates = HashMap::new();
    gates.insert(1, gate_a);
    gates.insert(2, gate_b);

    let app = app_with(Arc::new(GatedPredictor {
        started: started_tx,
        gates: Mutex::new(gates),
    }));
    sign_in(&app).await;

    let first = {
        let app = app.clone();
        tokio::spawn(async move { send_json(&app, Method::POST, "/api/predict", Some(form(1))).await })
    };
    assert_eq!(started_rx.recv().await, Some(1));

    let second = {
        let app = app.clone();
        tokio::spawn(async move { send_json(&app, Method::POST, "/api/predict", Some(form(2))).await })
    };
    assert_eq!(started_rx.recv().await, Some(2));

    release_b.send(result(20.0, 80.0)).unwrap();
    let (_, body_b) = second.await.unwrap();
    assert_eq!(body_b["data"]["applied"], true);

    release_a.send(result(10.0, 70.0)).unwrap();
    let (_, body_a) = first.await.unwrap();
    assert_eq!(body_a["data"]["applied"], false);

    let (_, shown) = send_json(&app, Method::GET, "/api/prediction", None).await;
    assert_eq!(shown["data"]["result"]["prediction"], 20.0);
    assert_eq!(shown["data"]["input"]["store_id"], 2);
}

#[tokio::test]
async fn layout_reflects_route_preferences_and_user() {
    let app = default_app();
    sign_in(&app).await;

    send_json(&app, Method::POST, "/api/preferences/theme", None).await;
    send_json(&app, Method::POST, "/api/preferences/sidebar", None).await;

    let (status, body) = send_json(&app, Method::GET, "/api/layout?path=/inventory", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Inventory Management");
    assert_eq!(body["data"]["theme"], "dark");
    assert_eq!(body["data"]["sidebar_collapsed"], true);
    assert_eq!(body["data"]["user"]["email"], "analyst@salespro.io");

    let active: Vec<&str> = body["data"]["navigation"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|i| i["active"] == true)
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(active, vec!["Inventory"]);

    let (_, body) = send_json(&app, Method::GET, "/api/layout", None).await;
    assert_eq!(body["data"]["title"], "Sales Prediction Dashboard");
}

#[tokio::test]
async fn placeholder_pages_and_settings_actions() {
    let app = default_app();
    sign_in(&app).await;

    let (status, body) = send_json(&app, Method::GET, "/api/pages/analytics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "No Analytics Data Yet");

    let (_, body) = send_json(&app, Method::GET, "/api/pages/settings", None).await;
    assert_eq!(body["data"]["profile"]["name"], "analyst");
    assert_eq!(body["data"]["profile"]["company"], "SalesPro Inc.");

    let (status, _) = send_json(&app, Method::GET, "/api/pages/reports", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send_json(&app, Method::POST, "/api/settings/profile", None).await;
    assert_eq!(status, StatusCode::OK);
    let toast_id = body["data"].as_str().unwrap().to_string();

    let (status, _) = send(&app, Method::DELETE, &format!("/api/toasts/{}", toast_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(toast_titles(&app).await.is_empty());

    let (status, _) = send(&app, Method::DELETE, &format!("/api/toasts/{}", toast_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn end_to_end_against_mock_model_server() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/predict")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "prediction": { "value": "17.25" },
                "confidence": 77,
                "factors": {
                    "store_factor": 2, "sku_factor": 1, "price_factor": 1, "marketing_factor": 1
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = HttpPredictionClient::new(format!("{}/predict", server.url())).unwrap();
    let app = app_with(Arc::new(client));
    sign_in(&app).await;

    let (status, body) = send_json(&app, Method::POST, "/api/predict", Some(form(5))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["result"]["prediction"], 17.25);
    assert_eq!(body["data"]["result"]["confidence"], 77.0);
    assert_eq!(body["data"]["result"]["factors"]["store_factor"], 2.0);
    mock.assert_async().await;

    let (_, health) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(health["status"], "degraded");
    assert_eq!(health["prediction_endpoint"], format!("{}/predict", server.url()));
}
