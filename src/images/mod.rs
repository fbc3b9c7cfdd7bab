//! Author portrait lookup and hosting.
//!
//! A portrait is found through an [`ImageSearch`] provider, copied into an
//! [`ImageHost`] under an identifier derived from the author's display name,
//! and served from the host's delivery URL. [`ImageResolver`] ties the two
//! together.

mod cloudflare;
mod google;
mod provider;
mod resolver;

pub use cloudflare::CloudflareImages;
pub use google::GoogleImageSearch;
pub use provider::{ImageHost, ImageSearch};
pub use resolver::ImageResolver;
