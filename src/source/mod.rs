//! Content sources that publish the quotes dataset.
//!
//! - [`ContentSource`] -- the fetch seam the sync run depends on.
//! - [`github`] -- GitHub repository contents API.

pub mod github;

use async_trait::async_trait;
use quotesync_common::{QuoteDataset, Result};

pub use github::GithubContentSource;

/// Retrieves the full quotes dataset.
///
/// Every failure (transport, non-success status, malformed JSON) is reported
/// as [`quotesync_common::Error::Fetch`]; a sync run cannot proceed on a
/// partial dataset.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Human-readable location of the dataset, for logs.
    fn location(&self) -> &str;

    async fn fetch(&self) -> Result<QuoteDataset>;
}
