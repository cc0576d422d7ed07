//! Router-level tests: login issues a usable bearer token, protected
//! routes refuse anonymous and under-privileged callers.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use common::TestApp;
use custodia_api::app_router;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn login_then_list_items() {
    let app = TestApp::new().await;
    app.seed_user("Hattie Http", "asset_manager").await;
    let router = app_router(app.state.clone());

    let login = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "email": "hattie.http@example.com",
                "password": "correct horse"
            })
            .to_string(),
        ))
        .unwrap();

    let response = router.clone().oneshot(login).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let tokens = body_json(response).await;
    let access = tokens["access_token"].as_str().expect("access token");

    let list = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/items")
        .header(header::AUTHORIZATION, format!("Bearer {}", access))
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(list).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["total"], json!(0));
}

#[tokio::test]
async fn anonymous_requests_are_unauthorized() {
    let app = TestApp::new().await;
    let router = app_router(app.state.clone());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/items")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = TestApp::new().await;
    app.seed_user("Wanda Wrong", "custodian").await;
    let router = app_router(app.state.clone());

    let login = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "email": "wanda.wrong@example.com",
                "password": "incorrect horse"
            })
            .to_string(),
        ))
        .unwrap();

    let response = router.oneshot(login).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn under_privileged_role_gets_forbidden() {
    let app = TestApp::new().await;
    app.seed_user("Colin Custodian", "custodian").await;
    let router = app_router(app.state.clone());

    let login = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "email": "colin.custodian@example.com",
                "password": "correct horse"
            })
            .to_string(),
        ))
        .unwrap();
    let response = router.clone().oneshot(login).await.unwrap();
    let tokens = body_json(response).await;
    let access = tokens["access_token"].as_str().expect("access token");

    // Custodians may not execute disposals.
    let request = Request::builder()
        .method(Method::POST)
        .uri(format!(
            "/api/v1/disposals/{}/execute",
            uuid::Uuid::new_v4()
        ))
        .header(header::AUTHORIZATION, format!("Bearer {}", access))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let app = TestApp::new().await;
    let router = app_router(app.state.clone());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
