//! # Forgeweb Server
//!
//! Serves a forgeweb application with its middleware stack installed.
//!
//! ## Usage
//!
//! ```bash
//! # Serve the application in the current directory in dev mode
//! forgeweb-server
//!
//! # Serve another application root in prod mode
//! FORGEWEB_APP_ROOT=/srv/app FORGEWEB_ENV=prod forgeweb-server
//!
//! # Override a setting from config/config.toml
//! FORGEWEB_BIND=0.0.0.0:8080 forgeweb-server
//! ```

use anyhow::{Context, Result};
use forgeweb_config::{SettingsLoader, DEFAULT_MODE};
use forgeweb_server::ServerConfig;
use std::env;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application entry point
#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting forgeweb server"
    );

    if let Err(e) = run().await {
        error!(error = %format!("{e:#}"), "Server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let root = env::var_os("FORGEWEB_APP_ROOT").map_or_else(|| PathBuf::from("."), PathBuf::from);
    let mode = env::var("FORGEWEB_ENV").unwrap_or_else(|_| DEFAULT_MODE.to_string());

    let store = SettingsLoader::app(&root)
        .mode(&mode)
        .load()
        .with_context(|| format!("Failed to load server settings for '{mode}'"))?;
    let config = ServerConfig::from_store(&store)?;

    info!(
        root = %root.display(),
        mode = %mode,
        bind = %config.bind,
        "Configuration loaded"
    );

    forgeweb_server::serve(config).await?;
    Ok(())
}
