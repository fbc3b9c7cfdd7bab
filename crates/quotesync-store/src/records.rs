//! Typed author records on top of a string key-value store.
//!
//! This is the only place that knows the key layout (`author_<author_id>`)
//! and the JSON encoding of [`AuthorRecord`].

use std::sync::Arc;

use quotesync_common::{AuthorId, AuthorRecord, Error, Result};

use crate::kv::KvStore;

/// Reads and writes [`AuthorRecord`]s through a [`KvStore`].
#[derive(Clone)]
pub struct RecordStore {
    kv: Arc<dyn KvStore>,
}

impl RecordStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Name of the backing store, for logging.
    pub fn backend(&self) -> &'static str {
        self.kv.name()
    }

    /// Load the record for `author_id`, or `None` if it was never written.
    ///
    /// A stored value that is not a valid record is an error, not a miss.
    pub async fn get(&self, author_id: &AuthorId) -> Result<Option<AuthorRecord>> {
        let key = author_id.storage_key();
        let Some(raw) = self.kv.get(&key).await? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| Error::store(format!("Corrupt record under {}: {}", key, e)))
    }

    /// Write `record` under its author's key, replacing any previous value.
    pub async fn put(&self, record: &AuthorRecord) -> Result<()> {
        let key = record.author_id.storage_key();
        let raw = serde_json::to_string(record)?;
        self.kv.put(&key, &raw).await
    }
}
