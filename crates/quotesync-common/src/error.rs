//! Common error types used throughout quotesync.
//!
//! One variant per failure class of a sync run: the dataset fetch, the image
//! providers, the key-value store, and record (de)serialization.

/// Common error type for quotesync.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The dataset could not be fetched or parsed. Fatal to a sync run.
    #[error("Failed to fetch dataset: {0}")]
    Fetch(String),

    /// An image provider could not be reached or answered unexpectedly.
    #[error("Image provider error: {0}")]
    ImageProvider(String),

    /// The image host rejected an upload.
    #[error("Image upload failed ({status}): {message}")]
    Upload {
        /// HTTP status returned by the provider.
        status: u16,
        /// Provider error payload, flattened to text.
        message: String,
    },

    /// A key-value store operation failed.
    #[error("Store error: {0}")]
    Store(String),

    /// A stored record could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration was provided.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Create a new Fetch error.
    pub fn fetch<S: Into<String>>(msg: S) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a new ImageProvider error.
    pub fn image_provider<S: Into<String>>(msg: S) -> Self {
        Self::ImageProvider(msg.into())
    }

    /// Create a new Upload error.
    pub fn upload<S: Into<String>>(status: u16, msg: S) -> Self {
        Self::Upload {
            status,
            message: msg.into(),
        }
    }

    /// Create a new Store error.
    pub fn store<S: Into<String>>(msg: S) -> Self {
        Self::Store(msg.into())
    }

    /// Create a new Config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Returns `true` for failures that happen while resolving an author's
    /// image, which a sync run may isolate to that author.
    pub fn is_image_failure(&self) -> bool {
        matches!(self, Self::ImageProvider(_) | Self::Upload { .. })
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
