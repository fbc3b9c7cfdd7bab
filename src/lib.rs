//! Quotesync - Quotes dataset and author portrait sync
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod context;
pub mod images;
pub mod server;
pub mod source;
pub mod sync;
