//! Portrait resolution for a single author.

use std::sync::Arc;

use quotesync_common::{ImageId, Result};
use tracing::debug;

use super::provider::{ImageHost, ImageSearch};

/// Finds, deduplicates and hosts an author's portrait.
///
/// The derived [`ImageId`] is the only cache: once an image is hosted under
/// it, later resolutions for the same display name reuse the hosted copy.
#[derive(Clone)]
pub struct ImageResolver {
    search: Arc<dyn ImageSearch>,
    host: Arc<dyn ImageHost>,
}

impl ImageResolver {
    pub fn new(search: Arc<dyn ImageSearch>, host: Arc<dyn ImageHost>) -> Self {
        Self { search, host }
    }

    /// Delivery URL for `display_name`'s portrait, or `None` when the search
    /// finds nothing.
    ///
    /// Errors come from the host only (lookup transport failures, failed
    /// downloads, rejected uploads).
    pub async fn resolve(&self, display_name: &str) -> Result<Option<String>> {
        let Some(candidate) = self.search.search(display_name).await else {
            debug!(display_name, provider = self.search.name(), "No portrait candidate");
            return Ok(None);
        };

        let image_id = ImageId::for_display_name(display_name);
        if let Some(existing) = self.host.exists(&image_id).await? {
            debug!(%image_id, "Reusing hosted portrait");
            return Ok(Some(existing));
        }

        let url = self.host.upload(&candidate, display_name).await?;
        debug!(%image_id, provider = self.host.name(), "Uploaded portrait");
        Ok(Some(url))
    }
}
