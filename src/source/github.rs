//! GitHub repository contents as a dataset source.
//!
//! Reads `/repos/{owner}/{name}/contents/{path}` with the raw media type so
//! the response body is the file itself rather than a base64 envelope.

use std::time::Duration;

use async_trait::async_trait;
use quotesync_common::{Error, QuoteDataset, Result};
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::{debug, error};

use super::ContentSource;
use crate::config::SourceConfig;

const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";
const USER_AGENT: &str = concat!("quotesync/", env!("CARGO_PKG_VERSION"));

pub struct GithubContentSource {
    client: Client,
    url: String,
    git_ref: Option<String>,
    token: String,
}

impl GithubContentSource {
    pub fn new(config: &SourceConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let url = format!(
            "{}/repos/{}/contents/{}",
            config.api_base.trim_end_matches('/'),
            config.repository,
            config.path.trim_start_matches('/'),
        );

        Ok(Self {
            client,
            url,
            git_ref: config.git_ref.clone(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl ContentSource for GithubContentSource {
    fn location(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<QuoteDataset> {
        let mut request = self.client.get(&self.url).header(ACCEPT, RAW_MEDIA_TYPE);
        if let Some(ref git_ref) = self.git_ref {
            request = request.query(&[("ref", git_ref)]);
        }
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }

        debug!(url = %self.url, "Fetching quotes dataset");
        let response = request
            .send()
            .await
            .map_err(|e| Error::fetch(format!("request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, url = %self.url, "Error fetching quotes dataset");
            return Err(Error::fetch(format!("{} returned {}", self.url, status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::fetch(format!("reading {} failed: {}", self.url, e)))?;

        serde_json::from_slice(&body)
            .map_err(|e| Error::fetch(format!("{} is not a valid dataset: {}", self.url, e)))
    }
}
