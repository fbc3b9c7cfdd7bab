//! Google Custom Search image provider.
//!
//! Implements [`ImageSearch`] on the Custom Search JSON API, asking for a
//! single large JPEG photo per query.

use std::time::Duration;

use async_trait::async_trait;
use quotesync_common::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::provider::ImageSearch;
use crate::config::SearchConfig;

/// Appended to every author name to bias results towards faces.
const QUERY_SUFFIX: &str = "portrait headshot";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}

pub struct GoogleImageSearch {
    client: Client,
    endpoint: String,
    api_key: String,
    engine_id: String,
}

impl GoogleImageSearch {
    pub fn new(config: &SearchConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            engine_id: config.engine_id.clone(),
        })
    }

    async fn first_link(&self, query: &str) -> Result<Option<String>> {
        let q = format!("{} {}", query, QUERY_SUFFIX);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", q.as_str()),
                ("searchType", "image"),
                ("imgType", "photo"),
                ("imgSize", "large"),
                ("fileType", "jpg"),
                ("num", "1"),
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::image_provider(format!("image search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::image_provider(format!(
                "image search returned {}: {}",
                status, body
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::image_provider(format!("malformed image search response: {}", e)))?;

        Ok(body.items.into_iter().next().map(|item| item.link))
    }
}

#[async_trait]
impl ImageSearch for GoogleImageSearch {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn search(&self, query: &str) -> Option<String> {
        match self.first_link(query).await {
            Ok(link) => {
                debug!(query, found = link.is_some(), "Image search finished");
                link
            }
            Err(e) => {
                warn!(query, error = %e, "Image search failed, treating as no result");
                None
            }
        }
    }
}
