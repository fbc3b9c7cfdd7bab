use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub images: ImagesConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8787
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Where the quotes dataset is published.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default = "default_github_api")]
    pub api_base: String,

    /// Repository in `owner/name` form
    #[serde(default = "default_repository")]
    pub repository: String,

    /// Path of the dataset file inside the repository
    #[serde(default = "default_dataset_path")]
    pub path: String,

    /// Branch, tag or commit to read from (default branch when unset)
    #[serde(default)]
    pub git_ref: Option<String>,

    /// Bearer token for private repositories (env: GITHUB_TOKEN)
    #[serde(default)]
    pub token: String,
}

fn default_github_api() -> String {
    "https://api.github.com".to_string()
}
fn default_repository() -> String {
    "flowqi-dev/quote-uploader".to_string()
}
fn default_dataset_path() -> String {
    "quotes.json".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_base: default_github_api(),
            repository: default_repository(),
            path: default_dataset_path(),
            git_ref: None,
            token: String::new(),
        }
    }
}

/// Image search provider (Google Custom Search JSON API).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    /// API key (env: GOOGLE_API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// Programmable search engine id (env: CUSTOM_SEARCH_ENGINE_ID)
    #[serde(default)]
    pub engine_id: String,
}

fn default_search_endpoint() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            api_key: String::new(),
            engine_id: String::new(),
        }
    }
}

/// Image hosting provider (Cloudflare Images).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImagesConfig {
    #[serde(default = "default_cloudflare_api")]
    pub api_base: String,

    /// Account id (env: CLOUDFLARE_ACCOUNT_ID)
    #[serde(default)]
    pub account_id: String,

    /// Images API token (env: CLOUDFLARE_IMAGES_API_TOKEN)
    #[serde(default)]
    pub api_token: String,
}

fn default_cloudflare_api() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            api_base: default_cloudflare_api(),
            account_id: String::new(),
            api_token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process-local map, lost on exit
    Memory,
    #[default]
    Sqlite,
    WorkersKv,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Sqlite => write!(f, "sqlite"),
            Self::WorkersKv => write!(f, "workers_kv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// SQLite database file
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    #[serde(default = "default_cloudflare_api")]
    pub api_base: String,

    /// Workers KV account id (falls back to `images.account_id`)
    #[serde(default)]
    pub account_id: String,

    /// Workers KV namespace id (env: CLOUDFLARE_KV_NAMESPACE_ID)
    #[serde(default)]
    pub namespace_id: String,

    /// Workers KV API token (env: CLOUDFLARE_KV_API_TOKEN)
    #[serde(default)]
    pub api_token: String,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("quotesync.db")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
            api_base: default_cloudflare_api(),
            account_id: String::new(),
            namespace_id: String::new(),
            api_token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Keep syncing the remaining authors when one author's image cannot be
    /// resolved (default: true)
    #[serde(default = "default_isolate_image_failures")]
    pub isolate_image_failures: bool,

    /// Timeout applied to every outbound HTTP request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_isolate_image_failures() -> bool {
    true
}
fn default_request_timeout() -> u64 {
    30
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            isolate_image_failures: default_isolate_image_failures(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}
