mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Environment variables that override secrets from the config file.
const ENV_OVERRIDES: &[&str] = &[
    "GITHUB_TOKEN",
    "GOOGLE_API_KEY",
    "CUSTOM_SEARCH_ENGINE_ID",
    "CLOUDFLARE_ACCOUNT_ID",
    "CLOUDFLARE_IMAGES_API_TOKEN",
    "CLOUDFLARE_KV_NAMESPACE_ID",
    "CLOUDFLARE_KV_API_TOKEN",
];

fn env_target<'a>(config: &'a mut Config, var: &str) -> Option<&'a mut String> {
    match var {
        "GITHUB_TOKEN" => Some(&mut config.source.token),
        "GOOGLE_API_KEY" => Some(&mut config.search.api_key),
        "CUSTOM_SEARCH_ENGINE_ID" => Some(&mut config.search.engine_id),
        "CLOUDFLARE_ACCOUNT_ID" => Some(&mut config.images.account_id),
        "CLOUDFLARE_IMAGES_API_TOKEN" => Some(&mut config.images.api_token),
        "CLOUDFLARE_KV_NAMESPACE_ID" => Some(&mut config.store.namespace_id),
        "CLOUDFLARE_KV_API_TOKEN" => Some(&mut config.store.api_token),
        _ => None,
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./quotesync.toml",
        "./config.toml",
        "~/.config/quotesync/config.toml",
        "/etc/quotesync/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Parse TOML content, apply environment overrides and validate.
pub fn parse_config(content: &str) -> Result<Config> {
    let mut config: Config = toml::from_str(content)?;
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Replace secrets with values from the environment where set and non-empty.
pub fn apply_env_overrides(config: &mut Config) {
    for var in ENV_OVERRIDES {
        let Ok(value) = std::env::var(var) else {
            continue;
        };
        if value.trim().is_empty() {
            continue;
        }
        if let Some(target) = env_target(config, var) {
            tracing::debug!("Using {} from environment", var);
            *target = value.trim().to_string();
        }
    }

    if config.store.account_id.is_empty() {
        config.store.account_id = config.images.account_id.clone();
    }
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.sync.request_timeout_secs == 0 {
        anyhow::bail!("sync.request_timeout_secs must be greater than 0");
    }

    match config.source.repository.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {}
        _ => anyhow::bail!(
            "source.repository must be in owner/name form, got '{}'",
            config.source.repository
        ),
    }

    if config.source.path.trim_matches('/').is_empty() {
        anyhow::bail!("source.path cannot be empty");
    }

    if config.store.backend == StoreBackend::WorkersKv {
        if config.store.account_id.is_empty() {
            anyhow::bail!("store backend workers_kv needs an account id");
        }
        if config.store.namespace_id.is_empty() {
            anyhow::bail!("store backend workers_kv needs a namespace_id");
        }
        if config.store.api_token.is_empty() {
            anyhow::bail!("store backend workers_kv needs an api_token");
        }
    }

    if config.search.api_key.is_empty() || config.search.engine_id.is_empty() {
        tracing::warn!("Image search credentials missing; new authors will get no image");
    }

    if config.images.account_id.is_empty() || config.images.api_token.is_empty() {
        tracing::warn!("Image hosting credentials missing; portrait uploads will fail");
    }

    Ok(())
}
