//! The sync run: merges a fetched dataset into the author records.
//!
//! Authors are processed strictly in dataset order, one at a time. Each author
//! costs exactly one record read and one record write, plus image provider
//! calls only while the record has no portrait.

use std::time::Instant;

use chrono::{DateTime, Utc};
use quotesync_common::{AuthorInput, AuthorRecord, QuoteDataset, Result};
use quotesync_store::RecordStore;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::images::ImageResolver;

#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Record a failed image resolution as "no image" for that author
    /// instead of aborting the run.
    pub isolate_image_failures: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            isolate_image_failures: true,
        }
    }
}

/// Summary of a completed sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub authors_processed: usize,
    pub authors_created: usize,
    pub authors_updated: usize,
    pub quotes_added: usize,
    pub images_resolved: usize,
    pub image_failures: usize,
}

impl SyncReport {
    fn begin() -> Self {
        Self {
            started_at: Utc::now(),
            duration_ms: 0,
            authors_processed: 0,
            authors_created: 0,
            authors_updated: 0,
            quotes_added: 0,
            images_resolved: 0,
            image_failures: 0,
        }
    }
}

/// Outcome of resolving one author's portrait.
enum ImageOutcome {
    Resolved(String),
    NotFound,
    Failed,
}

pub struct SyncOrchestrator {
    records: RecordStore,
    resolver: ImageResolver,
    options: SyncOptions,
}

impl SyncOrchestrator {
    pub fn new(records: RecordStore, resolver: ImageResolver, options: SyncOptions) -> Self {
        Self {
            records,
            resolver,
            options,
        }
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    /// Merge every author of `dataset` into the store.
    ///
    /// Store failures abort the run; authors written before the failure stay
    /// written.
    pub async fn sync(&self, dataset: &QuoteDataset) -> Result<SyncReport> {
        let clock = Instant::now();
        let mut report = SyncReport::begin();

        info!(
            authors = dataset.authors.len(),
            store = self.records.backend(),
            "Starting sync run"
        );

        for input in &dataset.authors {
            self.sync_author(input, &mut report).await?;
            report.authors_processed += 1;
        }

        report.duration_ms = clock.elapsed().as_millis() as u64;
        info!(
            processed = report.authors_processed,
            created = report.authors_created,
            updated = report.authors_updated,
            quotes_added = report.quotes_added,
            images_resolved = report.images_resolved,
            image_failures = report.image_failures,
            duration_ms = report.duration_ms,
            "Sync run finished"
        );

        Ok(report)
    }

    async fn sync_author(&self, input: &AuthorInput, report: &mut SyncReport) -> Result<()> {
        let record = match self.records.get(&input.author_id).await? {
            Some(mut record) => {
                let added = record.merge_quotes(&input.quotes);
                report.quotes_added += added;
                report.authors_updated += 1;

                if record.needs_image() {
                    if let Some(url) = self.resolve_image(input, report).await? {
                        record.image_url = Some(url);
                    }
                }

                debug!(author_id = %input.author_id, added, "Merged author");
                record
            }
            None => {
                let image_url = self.resolve_image(input, report).await?;
                report.quotes_added += input.quotes.len();
                report.authors_created += 1;

                debug!(author_id = %input.author_id, quotes = input.quotes.len(), "Created author");
                AuthorRecord::new(input, image_url)
            }
        };

        self.records.put(&record).await
    }

    async fn resolve_image(
        &self,
        input: &AuthorInput,
        report: &mut SyncReport,
    ) -> Result<Option<String>> {
        let outcome = match self.resolver.resolve(&input.author).await {
            Ok(Some(url)) => ImageOutcome::Resolved(url),
            Ok(None) => ImageOutcome::NotFound,
            Err(e) if e.is_image_failure() && self.options.isolate_image_failures => {
                warn!(
                    author_id = %input.author_id,
                    author = %input.author,
                    error = %e,
                    "Image resolution failed, continuing without image"
                );
                ImageOutcome::Failed
            }
            Err(e) => return Err(e),
        };

        Ok(match outcome {
            ImageOutcome::Resolved(url) => {
                report.images_resolved += 1;
                Some(url)
            }
            ImageOutcome::NotFound => None,
            ImageOutcome::Failed => {
                report.image_failures += 1;
                None
            }
        })
    }
}
