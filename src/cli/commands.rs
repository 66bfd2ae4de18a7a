//! CLI command implementations

use anyhow::Result;
use std::path::PathBuf;

use crate::api;
use crate::config;

/// Initialize a new labgate.toml configuration file
pub async fn init() -> Result<()> {
    let path = config::save_default_config()?;
    println!("Created {}", path.display());
    println!("Set JWT_SECRET_KEY (and Google credentials if needed), then run 'labgate serve'");
    Ok(())
}

/// Run the HTTP server
pub async fn serve(host: Option<String>, port: Option<u16>, config_path: Option<PathBuf>) -> Result<()> {
    let config = match config_path {
        Some(path) => config::load_config_from_path(&path)?,
        None => config::load_config()?,
    };

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    api::run_server(config, &host, port).await?;
    Ok(())
}
