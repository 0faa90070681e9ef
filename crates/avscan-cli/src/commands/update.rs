use anyhow::{Context, Result};
use avscan_core::Config;
use avscan_services::DefinitionUpdater;

/// Refresh the virus definitions, echoing the updater's output.
pub async fn run(config: &Config) -> Result<()> {
    println!("Updating FSecure DBs...");

    DefinitionUpdater::from_config(config)
        .update(|line| println!("update | {}", line))
        .await
        .context("failed to update virus definitions")
}
