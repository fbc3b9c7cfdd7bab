//! Trait definitions for the image providers.
//!
//! Two seams: [`ImageSearch`] finds a candidate portrait on the web, and
//! [`ImageHost`] keeps the uploaded copies and serves them publicly.

use async_trait::async_trait;
use quotesync_common::{ImageId, Result};

/// Web image search for author portraits.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"google"`).
    fn name(&self) -> &'static str;

    /// Link to the best portrait candidate for `query`, or `None`.
    ///
    /// Provider errors are indistinguishable from an empty result set.
    async fn search(&self, query: &str) -> Option<String>;
}

/// Image hosting with public delivery variants.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"cloudflare"`).
    fn name(&self) -> &'static str;

    /// Delivery URL of an already hosted image, or `None` when the host does
    /// not answer with success.
    async fn exists(&self, image_id: &ImageId) -> Result<Option<String>>;

    /// Copy the image at `source_url` into the host under the identifier
    /// derived from `display_name` and return its delivery URL.
    async fn upload(&self, source_url: &str, display_name: &str) -> Result<String>;
}
