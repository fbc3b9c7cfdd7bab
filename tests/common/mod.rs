//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which points every provider client at one
//! `wiremock` server and keeps the records in a [`MemoryKvStore`] the tests
//! can inspect directly.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use quotesync::config::Config;
use quotesync::context::AppContext;
use quotesync::images::{CloudflareImages, GoogleImageSearch, ImageResolver};
use quotesync::source::GithubContentSource;
use quotesync::sync::{SyncOptions, SyncOrchestrator};
use quotesync_store::{KvStore, MemoryKvStore, RecordStore};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CONTENTS_PATH: &str = "/repos/acme/quotes/contents/quotes.json";
pub const SEARCH_PATH: &str = "/customsearch/v1";
pub const IMAGES_PATH: &str = "/client/v4/accounts/acct/images/v1";

pub struct TestHarness {
    pub server: MockServer,
    pub kv: MemoryKvStore,
    pub ctx: AppContext,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::with_options(SyncOptions::default()).await
    }

    pub async fn with_options(options: SyncOptions) -> Self {
        let server = MockServer::start().await;
        let kv = MemoryKvStore::new();
        let ctx = context_with_store(&server, Arc::new(kv.clone()), options);
        Self { server, kv, ctx }
    }

    /// Serve `dataset` from the GitHub contents endpoint.
    pub async fn mount_dataset(&self, dataset: Value) {
        Mock::given(method("GET"))
            .and(path(CONTENTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(dataset))
            .mount(&self.server)
            .await;
    }

    /// Make the GitHub contents endpoint answer with `status`.
    pub async fn mount_dataset_status(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path(CONTENTS_PATH))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Make the image search return a portrait served by this mock server.
    pub async fn mount_search_hit(&self, display_name: &str, slug: &str) -> String {
        let link = format!("{}/portraits/{}.jpg", self.server.uri(), slug);
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("q", format!("{} portrait headshot", display_name)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "link": link }]
            })))
            .mount(&self.server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/portraits/{}.jpg", slug)))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/jpeg")
                    .set_body_bytes(b"JPEGDATA".to_vec()),
            )
            .mount(&self.server)
            .await;
        link
    }

    /// Accept uploads and answer with a delivery URL for `image_id`.
    pub async fn mount_upload(&self, image_id: &str, expected_calls: u64) -> String {
        let url = delivery_url(image_id);
        Mock::given(method("POST"))
            .and(path(IMAGES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "errors": [],
                "result": { "id": image_id, "variants": [url] }
            })))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
        url
    }

    /// Reject every upload with a Cloudflare error envelope.
    pub async fn mount_upload_rejected(&self) {
        Mock::given(method("POST"))
            .and(path(IMAGES_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "errors": [{ "code": 5400, "message": "Bad request" }],
                "result": null
            })))
            .mount(&self.server)
            .await;
    }

    /// Report `image_id` as already hosted.
    pub async fn mount_hosted(&self, image_id: &str) -> String {
        let url = delivery_url(image_id);
        Mock::given(method("GET"))
            .and(path(format!("{}/{}", IMAGES_PATH, image_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "errors": [],
                "result": { "id": image_id, "variants": [url] }
            })))
            .mount(&self.server)
            .await;
        url
    }

    /// Stored record under `key`, parsed as JSON.
    pub async fn record(&self, key: &str) -> Option<Value> {
        let raw = self.kv.get(key).await.unwrap()?;
        Some(serde_json::from_str(&raw).unwrap())
    }

    /// Requests the mock server received on `path`.
    pub async fn requests_to(&self, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == request_path)
            .count()
    }
}

pub fn delivery_url(image_id: &str) -> String {
    format!("https://imagedelivery.net/test-hash/{}/public", image_id)
}

/// Configuration whose providers all point at `server`.
pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.source.api_base = server.uri();
    config.source.repository = "acme/quotes".into();
    config.source.token = "gh-token".into();
    config.search.endpoint = format!("{}{}", server.uri(), SEARCH_PATH);
    config.search.api_key = "g-key".into();
    config.search.engine_id = "cx-1".into();
    config.images.api_base = format!("{}/client/v4", server.uri());
    config.images.account_id = "acct".into();
    config.images.api_token = "img-token".into();
    config.sync.request_timeout_secs = 5;
    config
}

/// Build an [`AppContext`] over `server` with an arbitrary record store.
pub fn context_with_store(
    server: &MockServer,
    kv: Arc<dyn KvStore>,
    options: SyncOptions,
) -> AppContext {
    let config = test_config(server);
    let timeout = Duration::from_secs(config.sync.request_timeout_secs);

    let source = GithubContentSource::new(&config.source, timeout).unwrap();
    let search = GoogleImageSearch::new(&config.search, timeout).unwrap();
    let host = CloudflareImages::new(&config.images, timeout).unwrap();

    let orchestrator = SyncOrchestrator::new(
        RecordStore::new(kv),
        ImageResolver::new(Arc::new(search), Arc::new(host)),
        options,
    );

    AppContext::new(config, Arc::new(source), orchestrator)
}
