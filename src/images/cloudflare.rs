//! Cloudflare Images host.
//!
//! Implements [`ImageHost`] on the Images v1 API:
//! - `GET  {api_base}/accounts/{account}/images/v1/{id}` for existence checks
//! - `POST {api_base}/accounts/{account}/images/v1` (multipart `file` + `id`)
//!   for uploads
//!
//! Both answer with the usual Cloudflare envelope; the first entry of
//! `result.variants` is the public delivery URL.

use std::time::Duration;

use async_trait::async_trait;
use quotesync_common::{Error, ImageId, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use super::provider::ImageHost;
use crate::config::ImagesConfig;

/// Used when the downloaded image carries no usable content type.
const FALLBACK_MIME: &str = "image/jpeg";

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    result: Option<ImageResult>,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ImageResult {
    #[serde(default)]
    variants: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

impl ApiEnvelope {
    fn first_variant(self) -> Option<String> {
        self.result.and_then(|r| r.variants.into_iter().next())
    }
}

/// Flatten a Cloudflare `errors` array into one line.
fn describe_errors(errors: &[ApiMessage]) -> String {
    errors
        .iter()
        .map(|e| match e.code {
            Some(code) => format!("{}: {}", code, e.message),
            None => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub struct CloudflareImages {
    client: Client,
    images_url: Url,
    api_token: String,
}

impl CloudflareImages {
    pub fn new(config: &ImagesConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let mut images_url = Url::parse(&config.api_base)
            .map_err(|e| Error::config(format!("Invalid images api_base: {}", e)))?;
        images_url
            .path_segments_mut()
            .map_err(|_| Error::config("Images api_base cannot be a base URL"))?
            .pop_if_empty()
            .extend(["accounts", config.account_id.as_str(), "images", "v1"]);

        Ok(Self {
            client,
            images_url,
            api_token: config.api_token.clone(),
        })
    }

    /// Lookup URL for one image. The id is a single, percent-encoded segment.
    fn image_url(&self, image_id: &ImageId) -> Url {
        let mut url = self.images_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(image_id.as_str());
        }
        url
    }

    /// Download the candidate image, returning its bytes and content type.
    async fn download(&self, source_url: &str) -> Result<(Vec<u8>, String)> {
        let response = self
            .client
            .get(source_url)
            .send()
            .await
            .map_err(|e| Error::image_provider(format!("download of {} failed: {}", source_url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::upload(
                status.as_u16(),
                format!("download of {} was not successful", source_url),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("image/"))
            .unwrap_or(FALLBACK_MIME)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::image_provider(format!("download of {} failed: {}", source_url, e)))?;

        Ok((bytes.to_vec(), content_type))
    }
}

#[async_trait]
impl ImageHost for CloudflareImages {
    fn name(&self) -> &'static str {
        "cloudflare"
    }

    async fn exists(&self, image_id: &ImageId) -> Result<Option<String>> {
        let response = self
            .client
            .get(self.image_url(image_id))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Error::image_provider(format!("lookup of {} failed: {}", image_id, e)))?;

        if !response.status().is_success() {
            debug!(%image_id, status = %response.status(), "Image not hosted yet");
            return Ok(None);
        }

        let envelope: ApiEnvelope = response.json().await.map_err(|e| {
            Error::image_provider(format!("malformed lookup response for {}: {}", image_id, e))
        })?;

        Ok(envelope.first_variant())
    }

    async fn upload(&self, source_url: &str, display_name: &str) -> Result<String> {
        let image_id = ImageId::for_display_name(display_name);
        let (bytes, content_type) = self.download(source_url).await?;

        let file = Part::bytes(bytes)
            .file_name(format!("{}.jpg", display_name))
            .mime_str(&content_type)
            .map_err(|e| Error::image_provider(format!("invalid content type {}: {}", content_type, e)))?;
        let form = Form::new()
            .part("file", file)
            .text("id", image_id.to_string());

        debug!(%image_id, source_url, "Uploading portrait");
        let response = self
            .client
            .post(self.images_url.clone())
            .bearer_auth(&self.api_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::image_provider(format!("upload of {} failed: {}", image_id, e)))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let envelope: Option<ApiEnvelope> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = envelope
                .map(|env| describe_errors(&env.errors))
                .filter(|m| !m.is_empty())
                .unwrap_or(body);
            return Err(Error::upload(status.as_u16(), message));
        }

        envelope.and_then(ApiEnvelope::first_variant).ok_or_else(|| {
            Error::upload(
                status.as_u16(),
                format!("upload of {} returned no delivery variant", image_id),
            )
        })
    }
}
