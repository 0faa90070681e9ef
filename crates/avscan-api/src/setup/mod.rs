//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use avscan_core::Config;
use std::sync::Arc;

/// Validate the configuration, prepare the staging directory and build the router.
pub async fn initialize_app(config: &Config) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;

    tokio::fs::create_dir_all(&config.staging_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create staging directory {}",
                config.staging_dir.display()
            )
        })?;

    let state = Arc::new(AppState::from_config(config));
    let router = routes::setup_routes(config, state.clone());

    Ok((state, router))
}

/// Initialize and serve until a shutdown signal arrives.
pub async fn run(config: Config) -> Result<()> {
    let (_state, router) = initialize_app(&config).await?;
    server::start_server(&config, router).await
}
