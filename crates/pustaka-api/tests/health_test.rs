//! Probe, request ID and OpenAPI document tests.
//!
//! Run with: `cargo test -p pustaka-api --test health_test`

mod helpers;

use helpers::setup_test_app;
use serde_json::Value;

#[tokio::test]
async fn liveness_and_readiness_answer() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "alive");

    let response = app.client().get("/ready").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["engine"], "memory");
}

#[tokio::test]
async fn request_id_is_generated_or_echoed() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    let generated = response.header("X-Request-ID");
    assert_eq!(generated.to_str().unwrap().len(), 36);

    let response = app
        .client()
        .get("/categories")
        .add_header("X-Request-ID", "grid-42")
        .await;
    assert_eq!(response.header("X-Request-ID"), "grid-42");
}

#[tokio::test]
async fn openapi_document_lists_catalog_routes() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["info"]["title"], "Pustaka API");
    assert!(body["paths"]["/books/{id}"]["put"].is_object());
    assert!(body["components"]["schemas"]["ErrorResponse"].is_object());
}
