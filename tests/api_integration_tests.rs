//! Integration Tests for the Governance Facade
//!
//! Tests full request/response cycles for the cache, rate-limit, and
//! proxy endpoints.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use gatekeeper::{api::create_router, rate_limit::LimitPolicy, AppState, Config};
use serde_json::Value;
use std::thread::sleep;
use std::time::Duration;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::from_config(&Config::default()))
}

/// App with a tight password-change policy for window tests.
fn create_limit_test_app(policy: LimitPolicy) -> Router {
    let mut config = Config::default();
    config.limit_password_change = policy;
    create_router(AppState::from_config(&config))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn put_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == Cache Endpoint Tests ==

#[tokio::test]
async fn test_cache_set_then_get_roundtrip() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(put_json(
            "/cache/set",
            r#"{"key":"profile","value":{"name":"ada","tags":["admin"]}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/cache/get/profile")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"]["name"], "ada");
    assert_eq!(json["value"]["tags"][0], "admin");
}

#[tokio::test]
async fn test_cache_get_absent_is_404() {
    let app = create_test_app();

    let response = app.oneshot(get("/cache/get/nonexistent")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cache_entry_expires() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_json(
            "/cache/set",
            r#"{"key":"ephemeral","value":"v","ttl_ms":1}"#,
        ))
        .await
        .unwrap();

    sleep(Duration::from_millis(30));

    let response = app.oneshot(get("/cache/get/ephemeral")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cache_set_empty_key_is_400() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json("/cache/set", r#"{"key":"","value":1}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cache_delete_is_idempotent() {
    let app = create_test_app();

    let response = app.clone().oneshot(delete("/cache/del/ghost")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(delete("/cache/del/ghost")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cache_clear_empties_namespace() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_json("/cache/set", r#"{"key":"a","value":1}"#))
        .await
        .unwrap();
    app.clone()
        .oneshot(put_json("/cache/set", r#"{"key":"b","value":2}"#))
        .await
        .unwrap();

    let response = app.clone().oneshot(delete("/cache/clear")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/cache/size")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["entries"], 0);

    let response = app.oneshot(get("/cache/get/a")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cache_size_grows_with_entries() {
    let app = create_test_app();

    let response = app.clone().oneshot(get("/cache/size")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["size_bytes"], 0);

    app.clone()
        .oneshot(put_json(
            "/cache/set",
            r#"{"key":"k","value":"0123456789"}"#,
        ))
        .await
        .unwrap();

    let response = app.oneshot(get("/cache/size")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert!(json["size_bytes"].as_u64().unwrap() > 10);
    assert_eq!(json["entries"], 1);
}

// == Rate Limit Endpoint Tests ==

#[tokio::test]
async fn test_limit_check_sequence_and_remaining() {
    let app = create_limit_test_app(LimitPolicy::new(3, 60_000));

    let expected = [
        (true, 2_u64),
        (true, 1),
        (true, 0),
        (false, 0),
    ];
    for (expected_allowed, expected_remaining) in expected {
        let response = app
            .clone()
            .oneshot(post_json(
                "/limits/password_change/check",
                r#"{"key":"user1"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["allowed"], expected_allowed);
        assert_eq!(json["remaining_attempts"], expected_remaining);
    }
}

#[tokio::test]
async fn test_limit_window_resets_after_expiry() {
    let app = create_limit_test_app(LimitPolicy::new(1, 60));

    let response = app
        .clone()
        .oneshot(post_json("/limits/password_change/check", r#"{"key":"u"}"#))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["allowed"], true);

    let response = app
        .clone()
        .oneshot(post_json("/limits/password_change/check", r#"{"key":"u"}"#))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["allowed"], false);

    sleep(Duration::from_millis(90));

    // Fresh window after expiry, full reset
    let response = app
        .oneshot(post_json("/limits/password_change/check", r#"{"key":"u"}"#))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["allowed"], true);
}

#[tokio::test]
async fn test_limit_status_endpoint_is_read_only() {
    let app = create_test_app();

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(get("/limits/profile_update/status/user1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["remaining_attempts"], 5);
        assert_eq!(json["time_until_reset_ms"], 0);
    }
}

#[tokio::test]
async fn test_limit_clear_resets_subject() {
    let app = create_limit_test_app(LimitPolicy::new(1, 60_000));

    app.clone()
        .oneshot(post_json("/limits/password_change/check", r#"{"key":"u"}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(delete("/limits/password_change/u"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json("/limits/password_change/check", r#"{"key":"u"}"#))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["allowed"], true);
}

#[tokio::test]
async fn test_limit_classes_are_independent() {
    let app = create_limit_test_app(LimitPolicy::new(1, 60_000));

    app.clone()
        .oneshot(post_json("/limits/password_change/check", r#"{"key":"u"}"#))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(post_json("/limits/password_change/check", r#"{"key":"u"}"#))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["allowed"], false);

    // Same subject, different class: untouched
    let response = app
        .oneshot(post_json("/limits/profile_update/check", r#"{"key":"u"}"#))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["allowed"], true);
}

#[tokio::test]
async fn test_limit_unknown_class_is_404() {
    let app = create_test_app();

    let response = app
        .oneshot(post_json("/limits/bogus/check", r#"{"key":"u"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Proxy Endpoint Tests ==

#[tokio::test]
async fn test_proxy_fetch_unreachable_is_502() {
    let app = create_test_app();

    // Discard port: connection refused immediately, surfaces as a fetch
    // failure rather than an internal error
    let response = app
        .oneshot(post_json(
            "/proxy/fetch",
            r#"{"url":"http://127.0.0.1:9/app.js"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_proxy_fetch_rejects_unknown_method() {
    let app = create_test_app();

    let response = app
        .oneshot(post_json(
            "/proxy/fetch",
            r#"{"url":"/x","method":"NOT A METHOD"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == Diagnostics Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_stats_reports_all_mechanisms() {
    let app = create_test_app();

    // One miss to move a counter
    app.clone().oneshot(get("/cache/get/none")).await.unwrap();

    let response = app.oneshot(get("/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["cache"]["misses"], 1);
    assert_eq!(json["proxy_state"], "uninstalled");
    assert_eq!(json["limiter_tracked_keys"], 0);
}
