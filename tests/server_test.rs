//! HTTP trigger tests.
//!
//! Drives the router with `tower::ServiceExt::oneshot`; the providers are
//! mocked by the shared harness.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::{context_with_store, TestHarness};
use http_body_util::BodyExt;
use quotesync::server::create_router;
use quotesync::server::routes_sync::FETCH_FAILED_BODY;
use quotesync::sync::SyncOptions;
use quotesync_common::{Error, Result};
use quotesync_store::KvStore;
use serde_json::json;
use tower::ServiceExt;

async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Store that can be read but refuses every write.
struct ReadOnlyKv;

#[async_trait]
impl KvStore for ReadOnlyKv {
    fn name(&self) -> &'static str {
        "read_only"
    }

    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::store("namespace is read-only"))
    }
}

#[tokio::test]
async fn health_check_returns_ok() {
    let harness = TestHarness::new().await;
    let app = create_router(harness.ctx.clone());

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn trigger_runs_full_sync() {
    let harness = TestHarness::new().await;
    harness
        .mount_dataset(json!({
            "authors": [
                { "author_id": 1, "author": "Ada Lovelace", "quotes": ["A"] },
                { "author_id": 2, "author": "Mark Twain", "quotes": ["B"] }
            ]
        }))
        .await;
    let app = create_router(harness.ctx.clone());

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_string(response.into_body()).await;
    assert_eq!(
        body,
        "Quotes and images updated successfully (2 authors processed)."
    );
    assert_eq!(harness.kv.len(), 2);
}

#[tokio::test]
async fn trigger_accepts_any_method_on_sync_path() {
    let harness = TestHarness::new().await;
    harness.mount_dataset(json!({ "authors": [] })).await;
    let app = create_router(harness.ctx.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/sync")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn fetch_failure_returns_500_without_writes() {
    let harness = TestHarness::new().await;
    harness.mount_dataset_status(404).await;
    let app = create_router(harness.ctx.clone());

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_to_string(response.into_body()).await, FETCH_FAILED_BODY);
    assert!(harness.kv.is_empty());
}

#[tokio::test]
async fn store_failure_returns_500() {
    let harness = TestHarness::new().await;
    harness
        .mount_dataset(json!({
            "authors": [{ "author_id": 1, "author": "Ada Lovelace", "quotes": ["A"] }]
        }))
        .await;
    let ctx = context_with_store(
        &harness.server,
        Arc::new(ReadOnlyKv),
        SyncOptions::default(),
    );
    let app = create_router(ctx);

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_to_string(response.into_body()).await;
    assert!(body.starts_with("Sync failed:"), "unexpected body: {}", body);
    assert!(body.contains("read-only"));
}
