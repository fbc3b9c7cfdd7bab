//! Quotesync-Store: key-value backends and typed author records.
//!
//! Author records live in a plain string key-value store. This crate provides
//! the [`KvStore`] abstraction, its backends, and [`RecordStore`], the typed
//! layer that owns key formatting and JSON (de)serialization.
//!
//! # Modules
//!
//! - `kv` - The [`KvStore`] trait
//! - `memory` - `DashMap`-backed store for tests and dry runs
//! - `sqlite` - SQLite store with r2d2 connection pooling
//! - `migrations` - Embedded schema migrations for the SQLite store
//! - `workers` - Cloudflare Workers KV over its REST API
//! - `records` - [`RecordStore`]
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use quotesync_common::AuthorId;
//! use quotesync_store::{RecordStore, SqliteKvStore};
//!
//! # async fn example() -> quotesync_common::Result<()> {
//! let kv = SqliteKvStore::open("/var/lib/quotesync/quotes.db")?;
//! let records = RecordStore::new(Arc::new(kv));
//!
//! if let Some(record) = records.get(&AuthorId::from(7)).await? {
//!     println!("{} has {} quotes", record.author, record.quotes.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod kv;
pub mod memory;
pub mod migrations;
pub mod records;
pub mod sqlite;
pub mod workers;

pub use kv::KvStore;
pub use memory::MemoryKvStore;
pub use records::RecordStore;
pub use sqlite::SqliteKvStore;
pub use workers::{WorkersKvConfig, WorkersKvStore};
