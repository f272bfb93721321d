mod common;

use axum_test::TestServer;
use common::{SAMPLE_CODES, StaticSource};
use serde_json::json;
use std::sync::Arc;

fn server_for(source: Arc<StaticSource>) -> TestServer {
    let state = common::create_test_state(source);
    TestServer::new(common::test_app(state)).unwrap()
}

#[tokio::test]
async fn test_list_codes_success() {
    let source = Arc::new(StaticSource::new(&SAMPLE_CODES));
    let server = server_for(source.clone());

    let response = server.get("/api/postcodes").await;

    response.assert_status_ok();
    assert_eq!(response.header("cache-control"), "max-age=86400");

    let json = response.json::<serde_json::Value>();
    assert_eq!(json, json!({ "codes": ["2000", "3000", "4000"] }));
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_repeated_requests_fetch_once() {
    let source = Arc::new(StaticSource::new(&SAMPLE_CODES));
    let server = server_for(source.clone());

    for _ in 0..3 {
        server.get("/api/postcodes").await.assert_status_ok();
    }
    server
        .post("/api/postcodes")
        .json(&json!({ "code": "2000" }))
        .await
        .assert_status_ok();

    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_check_existing_code() {
    let server = server_for(Arc::new(StaticSource::new(&SAMPLE_CODES)));

    let response = server
        .post("/api/postcodes")
        .json(&json!({ "code": "3000" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("cache-control"), "max-age=86400");
    assert_eq!(response.json::<serde_json::Value>(), json!({ "exists": true }));
}

#[tokio::test]
async fn test_check_missing_code() {
    let server = server_for(Arc::new(StaticSource::new(&SAMPLE_CODES)));

    let response = server
        .post("/api/postcodes")
        .json(&json!({ "code": "9999" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>(), json!({ "exists": false }));
}

#[tokio::test]
async fn test_check_numeric_code() {
    let server = server_for(Arc::new(StaticSource::new(&SAMPLE_CODES)));

    let numeric = server
        .post("/api/postcodes")
        .json(&json!({ "code": 3000 }))
        .await;
    let text = server
        .post("/api/postcodes")
        .json(&json!({ "code": "3000" }))
        .await;

    numeric.assert_status_ok();
    assert_eq!(
        numeric.json::<serde_json::Value>(),
        text.json::<serde_json::Value>()
    );
}

#[tokio::test]
async fn test_check_without_code_is_rejected() {
    let source = Arc::new(StaticSource::new(&SAMPLE_CODES));
    let server = server_for(source.clone());

    for body in [json!({}), json!({ "code": null }), json!({ "code": [3000] })] {
        let response = server.post("/api/postcodes").json(&body).await;

        response.assert_status_bad_request();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["code"], "validation_error");
    }

    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_check_non_json_body_is_rejected() {
    let server = server_for(Arc::new(StaticSource::new(&SAMPLE_CODES)));

    let response = server.post("/api/postcodes").text("code=3000").await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_fetch_failure_then_retry() {
    let source = Arc::new(StaticSource::failing_first(&["6000"], 1));
    let server = server_for(source.clone());

    let failed = server.get("/api/postcodes").await;
    assert_eq!(failed.status_code(), 503);
    let json = failed.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "upstream_unavailable");
    assert_eq!(json["error"]["details"]["reason"], "fetch_failed");
    assert!(!failed.text().contains("upstream unavailable"));

    let retried = server.get("/api/postcodes").await;
    retried.assert_status_ok();
    assert_eq!(
        retried.json::<serde_json::Value>(),
        json!({ "codes": ["6000"] })
    );
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_check_after_fetch_failure_is_unavailable() {
    let source = Arc::new(StaticSource::failing_first(&SAMPLE_CODES, 1));
    let server = server_for(source.clone());

    let response = server
        .post("/api/postcodes")
        .json(&json!({ "code": "2000" }))
        .await;
    assert_eq!(response.status_code(), 503);

    let response = server
        .post("/api/postcodes")
        .json(&json!({ "code": "2000" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>(), json!({ "exists": true }));
}
