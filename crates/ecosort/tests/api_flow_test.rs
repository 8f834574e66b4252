//! End-to-end flows: config -> connect -> router, against a mock database.

use std::collections::HashMap;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ecosort::{AppConfig, Application};

fn config_for(database_url: &str) -> AppConfig {
    let env: HashMap<String, String> = [
        ("FIREBASE_DB_URL", database_url),
        (
            "FIREBASE_CREDENTIALS_PATH",
            "/nonexistent/ecosort-credentials.json",
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    AppConfig::from_sources(None, &env).unwrap()
}

async fn mount_document(server: &MockServer, document: Value) {
    Mock::given(method("GET"))
        .and(path("/.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document))
        .mount(server)
        .await;
}

async fn call(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_status_reads_live_document() {
    let server = MockServer::start().await;
    mount_document(
        &server,
        json!({
            "system": {"state": "ANALYZING", "wifi": "Connected", "ssid": "lab-net"},
            "bin": {"lastWaste": "WET", "wetCount": 4, "wetFull": true, "lastUpdated": "12:00:01"}
        }),
    )
    .await;

    let app = Application::connect(config_for(&server.uri())).await;
    let (status, body) = call(app.router(), get("/api/status")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "systemState": "ANALYZING",
            "lastWaste": "WET",
            "wetFull": true,
            "dryFull": false,
            "wetCount": 4,
            "dryCount": 0,
            "connection_status": "Online",
            "wifi_status": "Connected",
            "ssid": "lab-net",
            "lastUpdated": "12:00:01"
        })
    );
}

#[tokio::test]
async fn test_health_reports_anonymous_transport() {
    let server = MockServer::start().await;
    mount_document(&server, json!({})).await;

    let app = Application::connect(config_for(&format!("{}/", server.uri()))).await;
    let (_, body) = call(app.router(), get("/api/health")).await;

    assert_eq!(
        body,
        json!({
            "status": "healthy",
            "firebase": {
                "status": "Connected",
                "method": "REST API (Public)",
                "database_url": server.uri()
            }
        })
    );
}

#[tokio::test]
async fn test_reset_patches_bin_and_system() {
    let server = MockServer::start().await;
    mount_document(&server, json!({"system": {"state": "SORTING"}})).await;
    Mock::given(method("PATCH"))
        .and(path("/bin.json"))
        .and(body_json(json!({"lastWaste": "NONE"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"lastWaste": "NONE"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/system.json"))
        .and(body_json(json!({"state": "IDLE"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "IDLE"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = Application::connect(config_for(&server.uri())).await;
    let (status, body) = call(app.router(), post("/api/reset_detection", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "System reset to IDLE"}));
}

#[tokio::test]
async fn test_statistics_from_bin_counters() {
    let server = MockServer::start().await;
    mount_document(&server, json!({})).await;
    Mock::given(method("GET"))
        .and(path("/bin.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"wetCount": 1, "dryCount": 2})),
        )
        .mount(&server)
        .await;

    let app = Application::connect(config_for(&server.uri())).await;
    let (_, body) = call(app.router(), get("/api/statistics")).await;

    assert_eq!(
        body,
        json!({
            "wetCount": 1,
            "dryCount": 2,
            "totalCount": 3,
            "wetPercentage": 33.3,
            "dryPercentage": 66.7
        })
    );
}

#[tokio::test]
async fn test_simulate_wet_marks_sorting() {
    let server = MockServer::start().await;
    mount_document(&server, json!({})).await;
    Mock::given(method("PATCH"))
        .and(path("/bin.json"))
        .and(body_json(json!({"lastWaste": "WET"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/system.json"))
        .and(body_json(json!({"state": "SORTING"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let app = Application::connect(config_for(&server.uri())).await;
    let (_, body) = call(app.router(), post("/api/simulate", json!({"action": "WET"}))).await;

    assert_eq!(
        body,
        json!({"status": "success", "action": "WET", "state": "SORTING"})
    );
}

#[tokio::test]
async fn test_rejected_probe_serves_offline_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.json"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let app = Application::connect(config_for(&server.uri())).await;

    let (_, status) = call(app.router(), get("/api/status")).await;
    assert_eq!(status["systemState"], "OFFLINE");
    assert_eq!(status["connection_status"], "Offline");

    let (_, stats) = call(app.router(), get("/api/statistics")).await;
    assert_eq!(stats["totalCount"], 0);

    let (_, reset) = call(app.router(), post("/api/reset_detection", json!({}))).await;
    assert_eq!(reset["success"], false);

    let (_, health) = call(app.router(), get("/api/health")).await;
    assert_eq!(health["firebase"]["status"], "Disconnected");
    assert_eq!(health["firebase"]["method"], "None");
}
