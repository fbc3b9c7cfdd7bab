mod cli;

use quotesync::{config, context::AppContext, server};
use quotesync_common::AuthorId;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting quotesync server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    let ctx = AppContext::from_config(config)?;
    server::start_server(ctx).await
}

async fn run_sync(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let ctx = AppContext::from_config(config)?;

    let report = ctx.run_sync().await.context("Sync run failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Sync complete in {} ms", report.duration_ms);
        println!("  Authors processed: {}", report.authors_processed);
        println!("    Created: {}", report.authors_created);
        println!("    Updated: {}", report.authors_updated);
        println!("  Quotes added: {}", report.quotes_added);
        println!("  Images resolved: {}", report.images_resolved);
        if report.image_failures > 0 {
            println!("  Image failures: {}", report.image_failures);
        }
    }

    Ok(())
}

async fn show_author(config_path: Option<&Path>, author_id: &str) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let ctx = AppContext::from_config(config)?;

    // `7` and `"7"` map to the same storage key.
    let author_id = AuthorId::from(author_id);

    match ctx.orchestrator.records().get(&author_id).await? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        None => anyhow::bail!("No record stored for author {}", author_id),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "quotesync=trace,quotesync_store=trace,quotesync_common=debug,tower_http=debug"
                .to_string()
        } else {
            "quotesync=info,quotesync_store=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Sync { json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_sync(cli.config.as_deref(), json))
        }
        Commands::Show { author_id } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(show_author(cli.config.as_deref(), &author_id))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("quotesync {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            config::load_config_or_default(None)?
        }
    };

    println!("✓ Configuration is valid");
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!(
        "  Source: {}/{}",
        config.source.repository, config.source.path
    );
    println!("  Store backend: {}", config.store.backend);
    println!(
        "  Image search configured: {}",
        !config.search.api_key.is_empty() && !config.search.engine_id.is_empty()
    );
    println!(
        "  Image hosting configured: {}",
        !config.images.account_id.is_empty() && !config.images.api_token.is_empty()
    );
    println!(
        "  Isolate image failures: {}",
        config.sync.isolate_image_failures
    );

    Ok(())
}
