//! Cloudflare Workers KV backend.
//!
//! Talks to the namespace through the Cloudflare REST API:
//! `GET`/`PUT {api_base}/accounts/{account}/storage/kv/namespaces/{ns}/values/{key}`.
//! A `404` on read means the key is absent.

use std::time::Duration;

use async_trait::async_trait;
use quotesync_common::{Error, Result};
use reqwest::{Client, StatusCode, Url};

use crate::kv::KvStore;

/// Connection settings for a Workers KV namespace.
#[derive(Debug, Clone)]
pub struct WorkersKvConfig {
    /// API root, e.g. `https://api.cloudflare.com/client/v4`.
    pub api_base: String,
    pub account_id: String,
    pub namespace_id: String,
    /// Bearer token with KV read/write permission.
    pub api_token: String,
}

/// Key-value store backed by a Workers KV namespace.
pub struct WorkersKvStore {
    client: Client,
    config: WorkersKvConfig,
}

impl WorkersKvStore {
    pub fn new(config: WorkersKvConfig, timeout: Duration) -> Result<Self> {
        if config.account_id.is_empty() || config.namespace_id.is_empty() {
            return Err(Error::config(
                "Workers KV needs both an account id and a namespace id",
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::store(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn value_url(&self, key: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.api_base)
            .map_err(|e| Error::config(format!("Invalid Workers KV api_base: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| Error::config("Workers KV api_base cannot be a base URL"))?
            .pop_if_empty()
            .extend([
                "accounts",
                self.config.account_id.as_str(),
                "storage",
                "kv",
                "namespaces",
                self.config.namespace_id.as_str(),
                "values",
                key,
            ]);

        Ok(url)
    }
}

#[async_trait]
impl KvStore for WorkersKvStore {
    fn name(&self) -> &'static str {
        "workers_kv"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(self.value_url(key)?)
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .map_err(|e| Error::store(format!("Workers KV read of {} failed: {}", key, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::store(format!(
                "Workers KV read of {} returned {}: {}",
                key, status, body
            )));
        }

        let value = response
            .text()
            .await
            .map_err(|e| Error::store(format!("Workers KV read of {} failed: {}", key, e)))?;
        Ok(Some(value))
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let response = self
            .client
            .put(self.value_url(key)?)
            .bearer_auth(&self.config.api_token)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(value.to_string())
            .send()
            .await
            .map_err(|e| Error::store(format!("Workers KV write of {} failed: {}", key, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::store(format!(
                "Workers KV write of {} returned {}: {}",
                key, status, body
            )));
        }

        Ok(())
    }
}
