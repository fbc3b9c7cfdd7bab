//! Shared application context.
//!
//! Wires the configured content source, image providers and record store
//! into one [`AppContext`] that the server and the CLI share.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use quotesync_common::QuoteDataset;
use quotesync_store::{
    KvStore, MemoryKvStore, RecordStore, SqliteKvStore, WorkersKvConfig, WorkersKvStore,
};

use crate::config::{Config, StoreBackend};
use crate::images::{CloudflareImages, GoogleImageSearch, ImageResolver};
use crate::source::{ContentSource, GithubContentSource};
use crate::sync::{SyncOptions, SyncOrchestrator, SyncReport};

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub source: Arc<dyn ContentSource>,
    pub orchestrator: Arc<SyncOrchestrator>,
}

impl AppContext {
    pub fn new(
        config: Config,
        source: Arc<dyn ContentSource>,
        orchestrator: SyncOrchestrator,
    ) -> Self {
        Self {
            config: Arc::new(config),
            source,
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Build every client and open the record store described by `config`.
    pub fn from_config(config: Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.sync.request_timeout_secs);

        let source = GithubContentSource::new(&config.source, timeout)
            .context("Failed to create content source")?;
        let search = GoogleImageSearch::new(&config.search, timeout)
            .context("Failed to create image search client")?;
        let host = CloudflareImages::new(&config.images, timeout)
            .context("Failed to create image host client")?;

        let kv = open_store(&config, timeout)?;
        tracing::info!("Using {} record store", config.store.backend);

        let orchestrator = SyncOrchestrator::new(
            RecordStore::new(kv),
            ImageResolver::new(Arc::new(search), Arc::new(host)),
            SyncOptions {
                isolate_image_failures: config.sync.isolate_image_failures,
            },
        );

        Ok(Self::new(config, Arc::new(source), orchestrator))
    }

    /// Fetch the dataset and merge it into the store.
    ///
    /// A fetch failure surfaces before any record is read or written.
    pub async fn run_sync(&self) -> quotesync_common::Result<SyncReport> {
        let dataset: QuoteDataset = self.source.fetch().await?;
        tracing::debug!(
            location = self.source.location(),
            authors = dataset.authors.len(),
            "Fetched quotes dataset"
        );
        self.orchestrator.sync(&dataset).await
    }
}

fn open_store(config: &Config, timeout: Duration) -> Result<Arc<dyn KvStore>> {
    let store = &config.store;
    let kv: Arc<dyn KvStore> = match store.backend {
        StoreBackend::Memory => Arc::new(MemoryKvStore::new()),
        StoreBackend::Sqlite => {
            let path = shellexpand::tilde(&store.path.to_string_lossy()).into_owned();
            if let Some(parent) = std::path::Path::new(&path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create store directory: {:?}", parent)
                    })?;
                }
            }
            Arc::new(
                SqliteKvStore::open(&path)
                    .with_context(|| format!("Failed to open SQLite store: {}", path))?,
            )
        }
        StoreBackend::WorkersKv => Arc::new(
            WorkersKvStore::new(
                WorkersKvConfig {
                    api_base: store.api_base.clone(),
                    account_id: store.account_id.clone(),
                    namespace_id: store.namespace_id.clone(),
                    api_token: store.api_token.clone(),
                },
                timeout,
            )
            .context("Failed to create Workers KV client")?,
        ),
    };
    Ok(kv)
}
