//! The string key-value abstraction every backend implements.

use async_trait::async_trait;
use quotesync_common::Result;

/// Async string key-value store.
///
/// Values are opaque strings; callers decide the encoding. Backends are
/// shared behind an `Arc` across request handlers.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Short, lowercase identifier for this backend (e.g. `"sqlite"`).
    fn name(&self) -> &'static str;

    /// Fetch the value stored under `key`, or `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> Result<()>;
}
