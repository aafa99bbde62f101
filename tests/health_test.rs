mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn liveness_returns_ok() {
    let app = common::test_app().await;
    let response = common::get(&app, "/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn api_health_reports_database() {
    let app = common::test_app().await;
    let response = common::get(&app, "/api/v1/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"], "connected");
    assert!(response.body["version"].is_string());
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = common::test_app().await;
    let response = common::get(&app, "/api/v1/nope").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
