use axum::body::{to_bytes, Body};
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::net::SocketAddr;
use tower::ServiceExt;

use fundscout::create_app_with_state;
use fundscout::pipeline::{new_shared_state, RunStatus};

fn request(method: &str, uri: &str) -> Request<Body> {
    let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
    Request::builder()
        .uri(uri)
        .method(method)
        .header("x-forwarded-for", "127.0.0.1")
        .extension(MockConnectInfo(addr))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = fundscout::create_app();

    let response = app.oneshot(request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_status_starts_idle() {
    let app = create_app_with_state(new_shared_state());

    let response = app.oneshot(request("GET", "/api/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "idle");
    assert_eq!(json["fundings"].as_array().unwrap().len(), 0);
    assert_eq!(json["jobs"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_run_rejected_while_running() {
    let state = new_shared_state();
    {
        let mut s = state.lock().unwrap();
        s.status = RunStatus::Running;
        s.progress = "Scraping 3 article(s)...".to_string();
    }

    let app = create_app_with_state(state.clone());

    let response = app.oneshot(request("POST", "/api/run")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("already running"));

    // The rejected request must not disturb the in-flight run.
    let snapshot = state.lock().unwrap().clone();
    assert_eq!(snapshot.status, RunStatus::Running);
    assert_eq!(snapshot.progress, "Scraping 3 article(s)...");
}

#[tokio::test]
async fn test_status_reports_terminal_state() {
    let state = new_shared_state();
    {
        let mut s = state.lock().unwrap();
        s.status = RunStatus::Done;
        s.progress = "Complete!".to_string();
        s.summary.articles_scraped = 2;
        s.summary.funding_entries = 7;
        s.summary.parsed = 5;
    }

    let app = create_app_with_state(state);
    let response = app.oneshot(request("GET", "/api/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "done");
    assert_eq!(json["progress"], "Complete!");
    assert_eq!(json["summary"]["articles_scraped"], 2);
    assert_eq!(json["summary"]["parsed"], 5);
}

#[tokio::test]
async fn test_index_serves_ui() {
    let app = fundscout::create_app();

    let response = app.oneshot(request("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("/api/status"));
}
