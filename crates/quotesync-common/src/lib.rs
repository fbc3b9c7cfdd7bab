//! Quotesync-Common: Shared types, identifiers, and errors.
//!
//! This crate provides the vocabulary used across quotesync:
//!
//! - **Dataset types**: [`QuoteDataset`] and [`AuthorInput`] as published by
//!   the content source
//! - **Persisted records**: [`AuthorRecord`] with its dedup-on-insert quote merge
//! - **Identifiers**: [`AuthorId`] (string or number) and the derived [`ImageId`]
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use quotesync_common::{AuthorId, ImageId};
//!
//! let id = AuthorId::from(7);
//! assert_eq!(id.storage_key(), "author_7");
//!
//! let image = ImageId::for_display_name("Maya Angelou");
//! assert_eq!(image.as_str(), "avatar-maya-angelou");
//! ```

pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
